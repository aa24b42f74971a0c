use crate::external::{Captured, ProcessRunner};
use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

/// Process runner with canned results; unknown programs fail to start.
#[derive(Default)]
pub(crate) struct FakeRunner {
    results: HashMap<String, Captured>,
    calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    pub(crate) fn with_output(self, program: &str, stdout: &str) -> Self {
        self.with_exit(program, stdout, 0)
    }

    pub(crate) fn with_exit(mut self, program: &str, stdout: &str, code: i32) -> Self {
        let captured = Captured {
            stdout: stdout.as_bytes().to_vec(),
            stderr: Vec::new(),
            code,
        };
        self.results.insert(program.to_string(), captured);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProcessRunner for FakeRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<Captured> {
        let mut call = program.to_string();
        for arg in args {
            call.push(' ');
            call.push_str(arg);
        }
        self.calls.lock().unwrap().push(call);
        self.results.get(program).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "executable file not found in $PATH")
        })
    }
}
