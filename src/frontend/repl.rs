use std::io::{BufRead, Write};

use crate::common::{DbError, Result, ValidationError};
use crate::table::{layout_constants, Table};

use super::command::{Command, MetaCommand, PrepareError, Statement};

const PROMPT: &str = "db > ";

/// Line-oriented shell over a [`Table`].
///
/// Reads commands from `input` until `.exit` or end of input, writing results
/// to `output`, then closes the table. Rejected statements are reported and
/// the loop continues; I/O failures and corruption end the session with an
/// error.
pub struct Repl<R, W> {
    table: Table,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(table: Table, input: R, output: W) -> Self {
        Self {
            table,
            input,
            output,
        }
    }

    pub fn run(mut self) -> Result<()> {
        let mut buf = Vec::new();

        loop {
            write!(self.output, "{PROMPT}")?;
            self.output.flush()?;

            buf.clear();
            if self.input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            // Invalid UTF-8 is reported like a malformed statement
            let Ok(line) = std::str::from_utf8(&buf) else {
                writeln!(self.output, "Syntax error. Could not parse statement.")?;
                continue;
            };

            match Command::parse(line) {
                Ok(Command::Meta(MetaCommand::Exit)) => break,
                Ok(Command::Meta(meta)) => self.run_meta(meta)?,
                Ok(Command::Statement(statement)) => self.execute(statement)?,
                Err(PrepareError::Syntax) => {
                    writeln!(self.output, "Syntax error. Could not parse statement.")?
                }
                Err(PrepareError::UnrecognizedStatement(text)) => {
                    writeln!(self.output, "Unrecognized keyword at start of '{text}'.")?
                }
            }
        }

        self.output.flush()?;
        self.table.close()
    }

    fn run_meta(&mut self, meta: MetaCommand) -> Result<()> {
        match meta {
            MetaCommand::Exit => {}
            MetaCommand::Constants => {
                writeln!(self.output, "Constants:")?;
                write!(self.output, "{}", layout_constants())?;
            }
            MetaCommand::BTree => {
                let tree = self.table.render_tree()?;
                writeln!(self.output, "Tree:")?;
                write!(self.output, "{tree}")?;
            }
            MetaCommand::Unrecognized(command) => {
                writeln!(self.output, "Unrecognized command: {command}")?;
            }
        }
        Ok(())
    }

    fn execute(&mut self, statement: Statement) -> Result<()> {
        match statement {
            Statement::Insert {
                id,
                username,
                email,
            } => match self.table.insert_values(id, &username, &email) {
                Ok(()) => writeln!(self.output, "Executed.")?,
                Err(DbError::Validation(e)) => {
                    writeln!(self.output, "{}", validation_message(&e))?
                }
                Err(DbError::DuplicateKey(_)) => writeln!(self.output, "Error: Duplicate key.")?,
                Err(DbError::TableFull) => writeln!(self.output, "Error: Table full.")?,
                Err(e) => return Err(e),
            },
            Statement::Select => {
                for row in self.table.select_all()? {
                    writeln!(self.output, "{}", row?)?;
                }
                writeln!(self.output, "Executed.")?;
            }
        }
        Ok(())
    }
}

fn validation_message(error: &ValidationError) -> &'static str {
    match error {
        ValidationError::IdNotPositive(_) => "ID must be positive.",
        ValidationError::IdOutOfRange(_) => "ID is too large.",
        ValidationError::StringTooLong { .. } => "String is too long.",
        ValidationError::InteriorNul { .. } => "String must not contain NUL bytes.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn run_script(path: &std::path::Path, commands: &[&str]) -> String {
        let table = Table::open(path).unwrap();
        let input = commands.join("\n");
        let mut output = Vec::new();
        Repl::new(table, input.as_bytes(), &mut output).run().unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_repl_insert_and_select() {
        let temp_file = NamedTempFile::new().unwrap();
        let output = run_script(
            temp_file.path(),
            &["insert 1 user1 person1@example.com", "select", ".exit"],
        );
        assert_eq!(
            output,
            "db > Executed.\ndb > (1, user1, person1@example.com)\nExecuted.\ndb > "
        );
    }

    #[test]
    fn test_repl_reports_rejections() {
        let temp_file = NamedTempFile::new().unwrap();
        let output = run_script(
            temp_file.path(),
            &[
                "insert 1 a b",
                "insert 1 a b",
                "insert 0 a b",
                "insert 3000000000 a b",
                "insert x a b",
                "update 1",
                ".foo",
            ],
        );
        assert_eq!(
            output,
            "db > Executed.\n\
             db > Error: Duplicate key.\n\
             db > ID must be positive.\n\
             db > ID is too large.\n\
             db > Syntax error. Could not parse statement.\n\
             db > Unrecognized keyword at start of 'update 1'.\n\
             db > Unrecognized command: .foo\n\
             db > "
        );
    }

    #[test]
    fn test_repl_continues_after_invalid_utf8() {
        let temp_file = NamedTempFile::new().unwrap();
        let table = Table::open(temp_file.path()).unwrap();
        let input: &[u8] = b"insert 1 a b\ninsert 2 \xff b\nselect\n";
        let mut output = Vec::new();

        Repl::new(table, input, &mut output).run().unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "db > Executed.\n\
             db > Syntax error. Could not parse statement.\n\
             db > (1, a, b)\n\
             Executed.\n\
             db > "
        );
    }

    #[test]
    fn test_repl_end_of_input_closes_table() {
        let temp_file = NamedTempFile::new().unwrap();
        run_script(temp_file.path(), &["insert 5 a b"]);

        let output = run_script(temp_file.path(), &["select"]);
        assert_eq!(output, "db > (5, a, b)\nExecuted.\ndb > ");
    }
}
