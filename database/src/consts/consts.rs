use std::fmt;

use serde::{Deserialize, Serialize};

// New Type Pattern -- https://doc.rust-lang.org/rust-by-example/generics/new_types.html
/// Surrogate key of a person row, assigned by the storage layer on insert
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonId(pub i32);

impl PersonId {
    pub fn to_number(self) -> i32 {
        self.0
    }

    pub fn increment(&self) -> PersonId {
        PersonId(self.0 + 1)
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Values
pub const REQRES_URL: &str = "https://reqres.in/api/users";
pub const FIRST_PAGE: u32 = 1;
pub const START_AT_ID: PersonId = PersonId(1);

// Column widths of the `persons` table
pub const EMAIL_MAX_LEN: usize = 128;
pub const NAME_MAX_LEN: usize = 128;
pub const AVATAR_MAX_LEN: usize = 256;
