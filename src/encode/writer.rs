use crate::types::Record;

pub(crate) struct Writer {
    buffer: String,
}

impl Writer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
        }
    }

    pub fn finish(self) -> String {
        self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn write_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    pub fn write_char(&mut self, ch: char) {
        self.buffer.push(ch);
    }

    pub fn write_newline(&mut self) {
        self.buffer.push('\n');
    }

    /// Starts a new line unless nothing has been written yet.
    pub fn begin_line(&mut self) {
        if !self.is_empty() {
            self.write_newline();
        }
    }

    pub fn write_usize(&mut self, value: usize) {
        let mut buf = itoa::Buffer::new();
        self.buffer.push_str(buf.format(value));
    }

    pub fn write_scalar(&mut self, key: &str, value: &str) {
        self.begin_line();
        self.write_str(key);
        self.write_str(": ");
        self.write_str(value);
    }

    /// `name[len]{field1,field2}:`, always with single braces.
    pub fn write_array_header(&mut self, name: &str, length: usize, fields: &[impl AsRef<str>]) {
        self.begin_line();
        self.write_str(name);
        self.write_char('[');
        self.write_usize(length);
        self.write_char(']');
        self.write_char('{');
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                self.write_char(',');
            }
            self.write_str(field.as_ref());
        }
        self.write_char('}');
        self.write_char(':');
    }

    pub fn write_row(&mut self, record: &Record) {
        self.write_newline();
        for (i, value) in record.values().enumerate() {
            if i > 0 {
                self.write_char(',');
            }
            self.write_str(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArrayBlock;

    #[rstest::rstest]
    fn test_header_and_rows() {
        let mut block = ArrayBlock::new(["item", "acao"]);
        block.push_numbered(["Buy milk, eggs"]);
        let mut writer = Writer::with_capacity(64);
        writer.write_array_header("passos", block.len(), block.fields());
        for record in block.records() {
            writer.write_row(record);
        }
        assert_eq!(writer.finish(), "passos[1]{item,acao}:\n1,Buy milk, eggs");
    }

    #[rstest::rstest]
    fn test_first_line_has_no_leading_newline() {
        let mut writer = Writer::with_capacity(16);
        writer.write_scalar("local", "Room A");
        writer.write_scalar("objetivo", "Plan");
        assert_eq!(writer.finish(), "local: Room A\nobjetivo: Plan");
    }
}
