// the print sink every decoder writes into
//
// decoders never glue separators together themselves: each nesting level
// (argument list, struct, array, flag group) remembers whether it already
// holds an element, and `next()` emits ", " only between elements.

#[derive(Clone, Debug)]
pub struct Printer {
    text: String,
    levels: Vec<bool>,
}

impl Default for Printer {
    fn default() -> Self {
        Printer::new()
    }
}

impl Printer {
    /// A printer positioned inside an argument list.
    pub fn new() -> Self {
        Printer {
            text: String::new(),
            levels: vec![false],
        }
    }

    pub fn text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// start of the next element at the current level
    pub fn next(&mut self) {
        if let Some(started) = self.levels.last_mut() {
            if *started {
                self.text.push_str(", ");
            }
            *started = true;
        }
    }

    pub fn field(&mut self, name: &str) {
        self.next();
        self.text.push_str(name);
        self.text.push('=');
    }

    /// next element carrying an already-rendered value
    pub fn item(&mut self, value: &str) {
        self.next();
        self.text.push_str(value);
    }

    pub fn struct_begin(&mut self) {
        self.text.push('{');
        self.levels.push(false);
    }

    pub fn struct_end(&mut self) {
        self.text.push('}');
        self.pop_level();
    }

    pub fn array_begin(&mut self) {
        self.text.push('[');
        self.levels.push(false);
    }

    pub fn array_end(&mut self) {
        self.text.push(']');
        self.pop_level();
    }

    /// the tracee has more than was shown
    pub fn more_data_follows(&mut self) {
        self.next();
        self.text.push_str("...");
    }

    /// value as the kernel left it on exit
    pub fn value_changed(&mut self) {
        self.text.push_str(" => ");
    }

    pub fn comment(&mut self, comment: &str) {
        self.text.push_str(" /* ");
        self.text.push_str(comment);
        self.text.push_str(" */");
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Hands over what was printed so far, nesting state is kept so a call
    /// printed across two stops continues where it stopped.
    pub fn take_text(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    fn pop_level(&mut self) {
        if self.levels.len() > 1 {
            self.levels.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_only_between_elements() {
        let mut out = Printer::new();
        out.item("1");
        out.next();
        out.struct_begin();
        out.field("a");
        out.text("2");
        out.field("b");
        out.array_begin();
        out.array_end();
        out.struct_end();
        out.item("3");
        assert_eq!(out.as_str(), "1, {a=2, b=[]}, 3");
    }

    #[test]
    fn more_data_is_an_element() {
        let mut out = Printer::new();
        out.array_begin();
        out.item("1");
        out.more_data_follows();
        out.array_end();
        assert_eq!(out.as_str(), "[1, ...]");

        let mut lonely = Printer::new();
        lonely.struct_begin();
        lonely.more_data_follows();
        lonely.struct_end();
        assert_eq!(lonely.as_str(), "{...}");
    }

    #[test]
    fn take_text_keeps_nesting() {
        let mut out = Printer::new();
        out.item("1");
        assert_eq!(out.take_text(), "1");
        out.item("2");
        assert_eq!(out.as_str(), ", 2");
    }
}
