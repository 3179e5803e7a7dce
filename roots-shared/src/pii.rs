use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps a contact detail (phone, email) so that log macros only ever see the
/// last four characters.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Masked<T>(pub T);

const VISIBLE_TAIL: usize = 4;

impl<T: fmt::Display> Masked<T> {
    fn masked(&self) -> String {
        let raw = self.0.to_string();
        let chars: Vec<char> = raw.chars().collect();
        if chars.len() <= VISIBLE_TAIL {
            return "*".repeat(chars.len());
        }
        let tail: String = chars[chars.len() - VISIBLE_TAIL..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - VISIBLE_TAIL), tail)
    }
}

impl<T: fmt::Display> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl<T: fmt::Display> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Responses need the real value; only formatting is masked.
        self.0.serialize(serializer)
    }
}
