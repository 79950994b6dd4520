use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

// -------------------------------------------------------------------------------------------------

/// `count` tiles starting at `offset`, 512 bytes apart. Serialized as `[offset, count]`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct TextureBatchJob {
    pub offset: usize,
    pub count:  usize,
}

/// `count` meta-tiles starting at `offset`, 16 bytes apart. Serialized as `[offset, count]`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct MetaTileBatchJob {
    pub offset: usize,
    pub count:  usize,
}

// -------------------------------------------------------------------------------------------------

macro_rules! impl_batch_job_tuple {
    ($job:ident) => {
        impl $job {
            pub const fn new(offset: usize, count: usize) -> Self {
                Self { offset, count }
            }
        }

        impl From<(usize, usize)> for $job {
            fn from((offset, count): (usize, usize)) -> Self {
                Self { offset, count }
            }
        }

        impl From<$job> for (usize, usize) {
            fn from(job: $job) -> Self {
                (job.offset, job.count)
            }
        }
    };
}

impl_batch_job_tuple!(TextureBatchJob);
impl_batch_job_tuple!(MetaTileBatchJob);

/// Reads a JSON array of `[offset, count]` pairs.
pub fn load_texture_jobs<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<TextureBatchJob>> {
    let path = path.as_ref();
    log::info!("Reading texture jobs from file: {}", path.display());
    let json = fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    let jobs: Vec<TextureBatchJob> =
        serde_json::from_str(&json).with_context(|| format!("Could not parse {}", path.display()))?;
    log::info!("Read {} texture jobs", jobs.len());
    Ok(jobs)
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jobs_are_pairs() {
        let jobs: Vec<TextureBatchJob> = serde_json::from_str("[[1108414, 4], [1240870, 255]]").unwrap();
        assert_eq!(jobs, vec![TextureBatchJob::new(0x10E9BE, 4), TextureBatchJob::new(0x12EF26, 255)]);

        let json = serde_json::to_string(&MetaTileBatchJob::new(0x15A10A, 256)).unwrap();
        assert_eq!(json, "[1417482,256]");
    }

    #[test]
    fn test_malformed_jobs_are_rejected() {
        assert!(serde_json::from_str::<Vec<TextureBatchJob>>("[[1, 2, 3]]").is_err());
        assert!(serde_json::from_str::<Vec<TextureBatchJob>>("[[-1, 2]]").is_err());
        assert!(serde_json::from_str::<Vec<TextureBatchJob>>("[{\"offset\": 1}]").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_texture_jobs("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
