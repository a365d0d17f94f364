//! 출력 수준에 따라 걸러지는 진행 메시지.
//!
//! 수준 0은 항상(quiet가 아니면) 출력되고, 그 위는 `-v` 옵션이 필요하다.
//! 메시지 문자열은 실제로 출력될 때만 만든다.

pub const NORMAL: u8 = 0;
pub const DETAIL: u8 = 1;
pub const LOOKUP: u8 = 2;
pub const TRACE: u8 = 3;

/// "오류만 출력"을 뜻하는 출력 수준.
pub const QUIET: i8 = -1;

pub trait Reporter {
    fn enabled(&self, level: u8, is_error: bool) -> bool;
    fn emit(&self, level: u8, is_error: bool, text: String);
}

/// 메시지를 보낸다. 받아들여질 때만 문자열을 만든다.
pub fn report(reporter: &dyn Reporter, level: u8, is_error: bool, text: impl FnOnce() -> String) {
    if reporter.enabled(level, is_error) {
        reporter.emit(level, is_error, text());
    }
}

pub fn info(reporter: &dyn Reporter, level: u8, text: impl FnOnce() -> String) {
    report(reporter, level, false, text);
}

pub fn error(reporter: &dyn Reporter, level: u8, text: impl FnOnce() -> String) {
    report(reporter, level, true, text);
}

/// CLI가 쓰는 stdout/stderr 출력기.
pub struct ConsoleReporter {
    verbosity: i8,
}

impl ConsoleReporter {
    pub fn new(verbosity: i8) -> Self {
        Self { verbosity }
    }
}

impl Reporter for ConsoleReporter {
    fn enabled(&self, level: u8, is_error: bool) -> bool {
        let threshold = if is_error {
            self.verbosity.max(0)
        } else {
            self.verbosity
        };
        i16::from(level) <= i16::from(threshold)
    }

    fn emit(&self, _level: u8, is_error: bool, text: String) {
        if is_error {
            eprintln!("{}", text);
        } else {
            println!("{}", text);
        }
    }
}

/// 받아들인 메시지를 모두 모아 둔다.
#[cfg(test)]
#[derive(Default)]
pub struct CaptureReporter {
    verbosity: i8,
    messages: std::cell::RefCell<Vec<(u8, bool, String)>>,
}

#[cfg(test)]
impl CaptureReporter {
    pub fn new(verbosity: i8) -> Self {
        Self {
            verbosity,
            messages: std::cell::RefCell::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<(u8, bool, String)> {
        self.messages.borrow().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages
            .borrow()
            .iter()
            .any(|(_, _, text)| text.contains(needle))
    }
}

#[cfg(test)]
impl Reporter for CaptureReporter {
    fn enabled(&self, level: u8, is_error: bool) -> bool {
        ConsoleReporter::new(self.verbosity).enabled(level, is_error)
    }

    fn emit(&self, level: u8, is_error: bool, text: String) {
        self.messages.borrow_mut().push((level, is_error, text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_default_verbosity_shows_level_zero_only() {
        let reporter = ConsoleReporter::new(0);
        assert!(reporter.enabled(NORMAL, false));
        assert!(!reporter.enabled(DETAIL, false));
        assert!(reporter.enabled(NORMAL, true));
        assert!(!reporter.enabled(TRACE, true));
    }

    #[test]
    fn test_quiet_shows_errors_only() {
        let reporter = ConsoleReporter::new(QUIET);
        assert!(!reporter.enabled(NORMAL, false));
        assert!(reporter.enabled(NORMAL, true));
        assert!(!reporter.enabled(DETAIL, true));
    }

    #[test]
    fn test_verbose_levels() {
        let reporter = ConsoleReporter::new(3);
        assert!(reporter.enabled(TRACE, false));
        assert!(reporter.enabled(TRACE, true));
    }

    #[test]
    fn test_text_not_built_when_filtered() {
        let reporter = CaptureReporter::new(0);
        let built = Cell::new(false);
        info(&reporter, TRACE, || {
            built.set(true);
            "expensive".to_string()
        });
        assert!(!built.get());
        assert!(reporter.messages().is_empty());

        info(&reporter, NORMAL, || "shown".to_string());
        assert!(reporter.contains("shown"));
    }
}
