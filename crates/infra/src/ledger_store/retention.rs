//! Age-based deletion of stored files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::error::LedgerError;

/// Files last modified strictly before `now - days` are expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    days: u32,
}

impl RetentionPolicy {
    pub fn days(days: u32) -> Self {
        Self { days }
    }

    /// `now - days`, saturating at the earliest representable instant.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        TimeDelta::try_days(i64::from(self.days))
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn is_expired(&self, modified: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        modified < self.cutoff(now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub cutoff: DateTime<Utc>,
    pub removed: Vec<PathBuf>,
}

/// Remove expired regular files directly inside `dir`, in path order.
///
/// Entries whose metadata cannot be read are skipped. The first failed
/// removal ends the pass.
pub(crate) fn sweep_dir<F>(
    dir: &Path,
    policy: RetentionPolicy,
    now: DateTime<Utc>,
    report: &mut SweepReport,
    mut remove: F,
) -> Result<(), LedgerError>
where
    F: FnMut(&Path) -> io::Result<()>,
{
    let mut entries = fs::read_dir(dir)
        .and_then(|entries| entries.collect::<io::Result<Vec<_>>>())
        .map_err(|e| LedgerError::io(dir, e))?;
    entries.sort_by_key(|entry| entry.path());

    for entry in entries {
        let path = entry.path();

        let modified = match entry.metadata().and_then(|m| {
            if m.is_file() {
                m.modified().map(Some)
            } else {
                Ok(None)
            }
        }) {
            Ok(Some(modified)) => DateTime::<Utc>::from(modified),
            Ok(None) => continue,
            Err(err) => {
                tracing::warn!("skipping {}: cannot read metadata: {err}", path.display());
                continue;
            }
        };

        if policy.is_expired(modified, now) {
            remove(&path).map_err(|e| {
                tracing::error!("failed to remove {}: {e}", path.display());
                LedgerError::Io {
                    path: path.clone(),
                    source: e,
                }
            })?;
            tracing::info!("removed expired file: {}", path.display());
            report.removed.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn cutoff_is_exclusive() {
        let policy = RetentionPolicy::days(7);
        let now = at(1_700_000_000);
        let cutoff = policy.cutoff(now);
        assert_eq!(cutoff, at(1_700_000_000 - 7 * 86_400));

        assert!(!policy.is_expired(cutoff, now));
        assert!(policy.is_expired(cutoff - TimeDelta::seconds(1), now));
        assert!(!policy.is_expired(cutoff + TimeDelta::seconds(1), now));
    }

    #[test]
    fn zero_days_expires_everything_older_than_now() {
        let policy = RetentionPolicy::days(0);
        let now = at(1_700_000_000);
        assert!(policy.is_expired(at(1_699_999_999), now));
        assert!(!policy.is_expired(now, now));
    }

    #[test]
    fn oversized_retention_expires_nothing() {
        let policy = RetentionPolicy::days(u32::MAX);
        let now = at(1_700_000_000);
        assert_eq!(policy.cutoff(now), DateTime::<Utc>::MIN_UTC);
        assert!(!policy.is_expired(at(0), now));
        assert!(!policy.is_expired(DateTime::<Utc>::MIN_UTC, now));

        let policy = RetentionPolicy::days(200_000_000);
        assert!(!policy.is_expired(at(-62_000_000_000), Utc::now()));
    }

    #[test]
    fn first_failed_removal_aborts_the_pass() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        for name in ["a.json", "b.json", "c.json"] {
            fs::write(tmp.path().join(name), "{}").unwrap();
        }
        let blocked = tmp.path().join("b.json");
        let now = Utc::now() + TimeDelta::days(2);
        let mut report = SweepReport {
            cutoff: RetentionPolicy::days(1).cutoff(now),
            removed: Vec::new(),
        };

        let err = sweep_dir(tmp.path(), RetentionPolicy::days(1), now, &mut report, |path| {
            if path == blocked {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
            } else {
                fs::remove_file(path)
            }
        })
        .unwrap_err();

        assert!(matches!(&err, LedgerError::Io { path, .. } if *path == blocked), "{err}");
        assert_eq!(report.removed, vec![tmp.path().join("a.json")]);
        assert!(!tmp.path().join("a.json").exists());
        assert!(blocked.exists());
        assert!(tmp.path().join("c.json").exists());
    }
}
