use std::cell::RefCell;
use std::rc::Rc;

/// Where demos print. Always logs at `info`; a capturing console also keeps
/// the lines so tests can read them back.
#[derive(Clone, Default)]
pub struct Console {
    captured: Option<Rc<RefCell<Vec<String>>>>,
}

impl Console {
    pub fn logging() -> Self {
        Self::default()
    }

    pub fn capture() -> Self {
        Self {
            captured: Some(Rc::new(RefCell::new(Vec::new()))),
        }
    }

    pub fn log(&self, line: impl Into<String>) {
        let line = line.into();
        log::info!("{line}");
        if let Some(c) = &self.captured {
            c.borrow_mut().push(line);
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.captured
            .as_ref()
            .map(|c| c.borrow().clone())
            .unwrap_or_default()
    }

    pub fn count(&self, line: &str) -> usize {
        self.captured
            .as_ref()
            .map(|c| c.borrow().iter().filter(|l| *l == line).count())
            .unwrap_or_default()
    }
}
