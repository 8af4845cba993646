//! Identity lines (`author`, `committer`, `tagger`)
//!
//! ## Format
//!
//! `<name> <<email>> <unix-timestamp> <timezone>`, e.g.
//! `Jane Doe <jane@example.com> 1700000000 +0200`

use anyhow::Context;

/// Name, email and timestamp attached to commits and tags
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Signature {
    name: String,
    email: String,
    when: chrono::DateTime<chrono::FixedOffset>,
}

impl Signature {
    /// Create a new signature with the current local time
    pub fn new(name: String, email: String) -> Self {
        Signature {
            name,
            email,
            when: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(
        name: String,
        email: String,
        when: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Signature { name, email, when }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn when(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.when
    }

    /// "Name <email@example.com>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// The identity line as stored in objects: "Name <email> timestamp timezone"
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.when.timestamp(),
            self.when.format("%z")
        )
    }

    /// Check that name and email fit in an identity line
    ///
    /// Angle brackets would move the email boundaries and a newline or NUL
    /// would end the header early, so none of them may appear.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (field, value) in [("name", &self.name), ("email", &self.email)] {
            if let Some(bad) = value.chars().find(|c| matches!(c, '<' | '>' | '\n' | '\0')) {
                anyhow::bail!("{field} {value:?} contains forbidden character {bad:?}");
            }
        }

        Ok(())
    }

    /// Load the signature from the environment
    ///
    /// Reads GIT_AUTHOR_NAME, GIT_AUTHOR_EMAIL, and optionally GIT_AUTHOR_DATE
    /// (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`). Without a date the current time is used.
    pub fn load_from_env() -> anyhow::Result<Self> {
        let name = std::env::var("GIT_AUTHOR_NAME").context("GIT_AUTHOR_NAME not set")?;
        let email = std::env::var("GIT_AUTHOR_EMAIL").context("GIT_AUTHOR_EMAIL not set")?;
        let when = std::env::var("GIT_AUTHOR_DATE").ok().and_then(|date_str| {
            chrono::DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        match when {
            Some(when) => Ok(Signature::new_with_timestamp(name, email, when)),
            None => Ok(Signature::new(name, email)),
        }
    }
}

impl TryFrom<&str> for Signature {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Split from right to get timezone and timestamp first
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            anyhow::bail!("Invalid signature format: {value}");
        }

        let timezone = parts[0];
        let timestamp = parts[1]
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("Invalid timestamp: {}", parts[1]))?;
        let name_email_part = parts[2];

        let email_start = name_email_part
            .find('<')
            .ok_or_else(|| anyhow::anyhow!("Invalid signature format: missing '<'"))?;
        let email_end = name_email_part
            .rfind('>')
            .filter(|end| *end > email_start)
            .ok_or_else(|| anyhow::anyhow!("Invalid signature format: missing '>'"))?;

        let name = name_email_part[..email_start].trim().to_string();
        let email = name_email_part[email_start + 1..email_end].to_string();

        let offset = chrono::DateTime::parse_from_str(
            &format!("1970-01-01 00:00:00 {timezone}"),
            "%Y-%m-%d %H:%M:%S %z",
        )
        .map_err(|_| anyhow::anyhow!("Invalid timezone: {timezone}"))?
        .timezone();
        let when = chrono::DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid timestamp: {timestamp}"))?
            .with_timezone(&offset);

        Ok(Signature { name, email, when })
    }
}
