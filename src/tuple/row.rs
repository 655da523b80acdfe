use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::common::{DbError, Result, ValidationError, COLUMN_EMAIL_SIZE, COLUMN_USERNAME_SIZE};

pub const ID_SIZE: usize = std::mem::size_of::<u32>();
/// Username slot: the data bytes plus one terminator byte
pub const USERNAME_SIZE: usize = COLUMN_USERNAME_SIZE + 1;
/// Email slot: the data bytes plus one terminator byte
pub const EMAIL_SIZE: usize = COLUMN_EMAIL_SIZE + 1;

pub const ID_OFFSET: usize = 0;
pub const USERNAME_OFFSET: usize = ID_OFFSET + ID_SIZE;
pub const EMAIL_OFFSET: usize = USERNAME_OFFSET + USERNAME_SIZE;
pub const ROW_SIZE: usize = ID_SIZE + USERNAME_SIZE + EMAIL_SIZE;

/// A single row of the table.
///
/// ## Row Binary Format
///
/// Every row occupies exactly [`ROW_SIZE`] bytes regardless of the string
/// lengths:
///
/// ```text
/// +-----------+----------------------+------------------------+
/// | id (u32)  | username (32 + NUL)  | email (255 + NUL)      |
/// | 4 bytes   | 33 bytes             | 256 bytes              |
/// +-----------+----------------------+------------------------+
/// ```
///
/// Strings are left-justified in their slot and followed by zero bytes.
/// Decoding stops at the first zero byte, or at the column capacity if the
/// data fills it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    id: u32,
    username: String,
    email: String,
}

impl Row {
    /// Builds a row, rejecting values that cannot be stored.
    ///
    /// `id` is taken as an `i64` so callers can hand over whatever they
    /// parsed; it must lie in `1..=i32::MAX`.
    pub fn new(
        id: i64,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> std::result::Result<Self, ValidationError> {
        if id <= 0 {
            return Err(ValidationError::IdNotPositive(id));
        }
        if id > i32::MAX as i64 {
            return Err(ValidationError::IdOutOfRange(id));
        }

        let username = username.into();
        let email = email.into();
        check_column("username", &username, COLUMN_USERNAME_SIZE)?;
        check_column("email", &email, COLUMN_EMAIL_SIZE)?;

        Ok(Self {
            id: id as u32,
            username,
            email,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Serializes the row into a fresh [`ROW_SIZE`]-byte buffer.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::zeroed(ROW_SIZE);
        self.encode_into(&mut buf);
        buf.freeze()
    }

    /// Serializes the row into the first [`ROW_SIZE`] bytes of `dst`.
    ///
    /// # Panics
    /// Panics if `dst` is shorter than [`ROW_SIZE`].
    pub fn encode_into(&self, dst: &mut [u8]) {
        assert!(dst.len() >= ROW_SIZE, "Row buffer must hold ROW_SIZE bytes");

        let mut out = &mut dst[..ROW_SIZE];
        out.put_u32_le(self.id);
        put_padded(&mut out, self.username.as_bytes(), USERNAME_SIZE);
        put_padded(&mut out, self.email.as_bytes(), EMAIL_SIZE);
    }

    /// Deserializes a row from the first [`ROW_SIZE`] bytes of `src`.
    pub fn decode(src: &[u8]) -> Result<Self> {
        if src.len() < ROW_SIZE {
            return Err(DbError::Corrupted(format!(
                "row needs {} bytes, found {}",
                ROW_SIZE,
                src.len()
            )));
        }

        let mut buf = &src[..ROW_SIZE];
        let id = buf.get_u32_le();
        let username = read_padded(&mut buf, "username", COLUMN_USERNAME_SIZE, USERNAME_SIZE)?;
        let email = read_padded(&mut buf, "email", COLUMN_EMAIL_SIZE, EMAIL_SIZE)?;

        Ok(Self {
            id,
            username,
            email,
        })
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.username, self.email)
    }
}

fn check_column(
    column: &'static str,
    value: &str,
    max: usize,
) -> std::result::Result<(), ValidationError> {
    if value.len() > max {
        return Err(ValidationError::StringTooLong {
            column,
            len: value.len(),
            max,
        });
    }
    if value.as_bytes().contains(&0) {
        return Err(ValidationError::InteriorNul { column });
    }
    Ok(())
}

fn put_padded(out: &mut &mut [u8], value: &[u8], slot: usize) {
    out.put_slice(value);
    out.put_bytes(0, slot - value.len());
}

fn read_padded(
    buf: &mut &[u8],
    column: &'static str,
    capacity: usize,
    slot: usize,
) -> Result<String> {
    let data = &buf[..capacity];
    let len = data.iter().position(|&b| b == 0).unwrap_or(capacity);
    let value = std::str::from_utf8(&data[..len])
        .map_err(|e| DbError::Corrupted(format!("{column} is not valid UTF-8: {e}")))?
        .to_owned();
    buf.advance(slot);
    Ok(value)
}
