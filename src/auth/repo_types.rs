use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// One registered user, as persisted in the snapshot file or the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub email: String, // unique key, compared exactly
    pub password: String, // Argon2 PHC string
    #[serde(with = "iso_millis")]
    pub timestamp: OffsetDateTime,
}

impl UserRecord {
    /// Builds a record stamped with the current UTC time, truncated to milliseconds.
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        let timestamp = now.replace_millisecond(now.millisecond()).unwrap_or(now);
        Self {
            email: email.into(),
            password: password_hash.into(),
            timestamp,
        }
    }
}

/// `2024-01-01T00:00:00.000Z`: UTC with exactly three fractional digits.
/// Parsing accepts any RFC 3339 timestamp.
mod iso_millis {
    use serde::{de::Error as _, ser::Error as _, Deserialize, Deserializer, Serializer};
    use time::{
        format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
        UtcOffset,
    };

    pub fn serialize<S: Serializer>(ts: &OffsetDateTime, s: S) -> Result<S::Ok, S::Error> {
        let format =
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");
        let text = ts
            .to_offset(UtcOffset::UTC)
            .format(format)
            .map_err(S::Error::custom)?;
        s.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<OffsetDateTime, D::Error> {
        let text = String::deserialize(d)?;
        OffsetDateTime::parse(&text, &Rfc3339).map_err(D::Error::custom)
    }
}
