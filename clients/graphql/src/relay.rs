use base64::{engine::general_purpose::STANDARD, Engine as _};
use juniper::{GraphQLObject, ID};
use thiserror::Error;

const CURSOR_PREFIX: &str = "arrayconnection:";

/// Relay global id, base64 of `<type>:<id>`
pub fn to_global_id(type_name: &str, id: &str) -> ID {
    ID::from(STANDARD.encode(format!("{}:{}", type_name, id)))
}

/// Splits a global id into type name and local id, `None` if it is not one
pub fn from_global_id(global_id: &str) -> Option<(String, String)> {
    let decoded = String::from_utf8(STANDARD.decode(global_id).ok()?).ok()?;
    let (type_name, id) = decoded.split_once(':')?;

    Some((type_name.to_string(), id.to_string()))
}

pub fn offset_to_cursor(offset: usize) -> String {
    STANDARD.encode(format!("{}{}", CURSOR_PREFIX, offset))
}

pub fn cursor_to_offset(cursor: &str) -> Option<usize> {
    let decoded = String::from_utf8(STANDARD.decode(cursor).ok()?).ok()?;

    decoded.strip_prefix(CURSOR_PREFIX)?.parse().ok()
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionArgs {
    pub first: Option<i32>,
    pub after: Option<String>,
    pub last: Option<i32>,
    pub before: Option<String>,
}

#[derive(GraphQLObject, Debug, Clone, PartialEq)]
#[graphql(description = "Information about pagination in a connection.")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// Offsets `[start, end)` of the rows a connection returns out of `total`
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl Window {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn page_info(&self) -> PageInfo {
        let (start_cursor, end_cursor) = if self.len() == 0 {
            (None, None)
        } else {
            (
                Some(offset_to_cursor(self.start)),
                Some(offset_to_cursor(self.end - 1)),
            )
        };

        PageInfo {
            has_next_page: self.has_next_page,
            has_previous_page: self.has_previous_page,
            start_cursor,
            end_cursor,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SliceError {
    #[error("Argument \"first\" must be a non-negative integer, got {0}")]
    NegativeFirst(i32),
    #[error("Argument \"last\" must be a non-negative integer, got {0}")]
    NegativeLast(i32),
}

/// Relay array slicing over `total` rows. Cursors that do not decode are ignored, offsets past
/// `i64::MAX` are clamped to it.
pub fn slice(total: usize, args: &ConnectionArgs) -> Result<Window, SliceError> {
    let length = i64::try_from(total).unwrap_or(i64::MAX);

    let before_offset = args
        .before
        .as_deref()
        .and_then(cursor_to_offset)
        .map_or(length, clamp_offset);
    let after_offset = args
        .after
        .as_deref()
        .and_then(cursor_to_offset)
        .map_or(-1, clamp_offset);

    let mut start = after_offset.saturating_add(1);
    let mut end = before_offset.min(length);

    if let Some(first) = args.first {
        if first < 0 {
            return Err(SliceError::NegativeFirst(first));
        }
        end = end.min(start.saturating_add(i64::from(first)));
    }

    if let Some(last) = args.last {
        if last < 0 {
            return Err(SliceError::NegativeLast(last));
        }
        start = start.max(end - i64::from(last));
    }

    let lower_bound = if args.after.is_some() {
        after_offset.saturating_add(1)
    } else {
        0
    };
    let upper_bound = if args.before.is_some() { before_offset } else { length };

    Ok(Window {
        start: start.clamp(0, length) as usize,
        end: end.max(0) as usize,
        has_previous_page: args.last.is_some() && start > lower_bound,
        has_next_page: args.first.is_some() && end < upper_bound,
    })
}

fn clamp_offset(offset: usize) -> i64 {
    i64::try_from(offset).unwrap_or(i64::MAX)
}
