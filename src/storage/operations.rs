//! Storage operations
//!
//! Renders directory enumerations into the three listing formats sent on
//! the data connection, and formats timestamps for MLSD/MDTM.

use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::time::SystemTime;

use crate::protocol::commands::FtpCommand;
use crate::storage::permissions::{octal_mode, unix_permissions};
use crate::storage::results::DirEntry;

/// Which listing a client asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFormat {
    /// `LIST`: `ls -l` style lines.
    List,
    /// `MLSD`: RFC 3659 machine-readable facts.
    Mlsd,
    /// `NLST`: bare names.
    Nlst,
}

impl ListingFormat {
    pub fn for_command(code: FtpCommand) -> Option<Self> {
        match code {
            FtpCommand::List => Some(ListingFormat::List),
            FtpCommand::Mlsd => Some(ListingFormat::Mlsd),
            FtpCommand::Nlst => Some(ListingFormat::Nlst),
            _ => None,
        }
    }
}

/// `YYYYMMDDHHMMSS` in UTC.
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format("%Y%m%d%H%M%S").to_string()
}

fn list_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format("%b %d %H:%M").to_string()
}

/// Renders every entry as one CRLF-terminated line.
pub fn render_listing(entries: &[DirEntry], format: ListingFormat) -> Vec<u8> {
    let mut out = String::new();
    for entry in entries {
        let modified = entry.modified.unwrap_or(SystemTime::UNIX_EPOCH);
        // Writing into a String cannot fail.
        let _ = match format {
            ListingFormat::List => write!(
                out,
                "{} {:>4} {:<8} {:<8} {:>10} {} {}\r\n",
                unix_permissions(entry.is_dir),
                if entry.is_dir { 2 } else { 1 },
                0,
                0,
                entry.size,
                list_date(modified),
                entry.name
            ),
            ListingFormat::Mlsd => {
                let size = if entry.is_dir {
                    String::new()
                } else {
                    format!("size={};", entry.size)
                };
                write!(
                    out,
                    "modify={};UNIX.group=0;UNIX.owner=0;UNIX.mode={};{}type={}; {}\r\n",
                    format_timestamp(modified),
                    octal_mode(entry.is_dir),
                    size,
                    if entry.is_dir { "dir" } else { "file" },
                    entry.name
                )
            }
            ListingFormat::Nlst => write!(out, "{}\r\n", entry.name),
        };
    }
    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn entries() -> Vec<DirEntry> {
        // 2021-03-04 05:06:07 UTC
        let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(1_614_834_367);
        vec![
            DirEntry {
                name: "docs".into(),
                is_dir: true,
                size: 0,
                modified: Some(modified),
            },
            DirEntry {
                name: "a.txt".into(),
                is_dir: false,
                size: 12,
                modified: Some(modified),
            },
        ]
    }

    #[test]
    fn timestamp_is_utc_compact() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_614_834_367);
        assert_eq!(format_timestamp(time), "20210304050607");
    }

    #[test]
    fn mlsd_lines() {
        let text = String::from_utf8(render_listing(&entries(), ListingFormat::Mlsd)).unwrap();
        let lines: Vec<_> = text.split("\r\n").collect();
        assert_eq!(
            lines[0],
            "modify=20210304050607;UNIX.group=0;UNIX.owner=0;UNIX.mode=0755;type=dir; docs"
        );
        assert_eq!(
            lines[1],
            "modify=20210304050607;UNIX.group=0;UNIX.owner=0;UNIX.mode=0644;size=12;type=file; a.txt"
        );
    }

    #[test]
    fn list_lines_look_like_ls() {
        let text = String::from_utf8(render_listing(&entries(), ListingFormat::List)).unwrap();
        let mut lines = text.lines();
        let dir = lines.next().unwrap();
        assert!(dir.starts_with("drwxr-xr-x"));
        assert!(dir.ends_with("Mar 04 05:06 docs"));
        let file = lines.next().unwrap();
        assert!(file.starts_with("-rw-r--r--"));
        assert!(file.contains(" 12 "));
        assert!(file.ends_with("a.txt"));
    }

    #[test]
    fn nlst_is_names_only() {
        assert_eq!(render_listing(&entries(), ListingFormat::Nlst), b"docs\r\na.txt\r\n");
    }
}
