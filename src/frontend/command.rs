/// Commands starting with a dot, handled by the shell itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    Exit,
    Constants,
    BTree,
    Unrecognized(String),
}

/// Statements that operate on the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert {
        id: i64,
        username: String,
        email: String,
    },
    Select,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrepareError {
    /// The statement keyword was recognized but its arguments were not.
    Syntax,
    /// The line does not start with a known keyword.
    UnrecognizedStatement(String),
}

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Meta(MetaCommand),
    Statement(Statement),
}

impl Command {
    /// Parses a single input line. Surrounding whitespace is ignored.
    ///
    /// Only the shape of a statement is checked here; value limits such as
    /// id positivity and string lengths are enforced by the table.
    pub fn parse(line: &str) -> Result<Command, PrepareError> {
        let line = line.trim();

        if line.starts_with('.') {
            let meta = match line {
                ".exit" => MetaCommand::Exit,
                ".constants" => MetaCommand::Constants,
                ".btree" => MetaCommand::BTree,
                other => MetaCommand::Unrecognized(other.to_string()),
            };
            return Ok(Command::Meta(meta));
        }

        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("insert") => {
                let (Some(id), Some(username), Some(email), None) =
                    (tokens.next(), tokens.next(), tokens.next(), tokens.next())
                else {
                    return Err(PrepareError::Syntax);
                };
                let id = id.parse::<i64>().map_err(|_| PrepareError::Syntax)?;

                Ok(Command::Statement(Statement::Insert {
                    id,
                    username: username.to_string(),
                    email: email.to_string(),
                }))
            }
            Some("select") if tokens.next().is_none() => Ok(Command::Statement(Statement::Select)),
            Some("select") => Err(PrepareError::Syntax),
            _ => Err(PrepareError::UnrecognizedStatement(line.to_string())),
        }
    }
}
