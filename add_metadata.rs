/* This file is part of the ytconv project
*
*  Copyright (C) 2024-2025 mini_bomba
*
*  Parts of this build script follow the built library: https://github.com/lukaslueg/built,
*  which is licensed under the MIT license.
*  
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use std::{env, fs::File, io::{BufWriter, Write}, path::{Path, PathBuf}};

use chrono::{FixedOffset, TimeZone};
use cloneable_errors::{ErrContext, ErrorContext, ResContext};
use git2::Repository;

fn main() -> Result<(), ErrorContext> {
    let out_dir = PathBuf::from(env::var("OUT_DIR").context("OUT_DIR not set")?);
    let built_file = out_dir.join("built.rs");
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").context("CARGO_MANIFEST_DIR not set")?);

    built::write_built_file_with_opts(Some(manifest_dir.as_path()), &built_file)
        .context("Failed to compile build-time info")?;

    let commit_time = commit_timestamp(&manifest_dir).context("Failed to read the commit timestamp")?;

    let mut file = BufWriter::new(
        File::options().append(true).open(&built_file).context("Failed to open the build-time info file")?
    );
    let commit_time = match commit_time {
        Some(time) => format!("Some(\"{}\")", time.escape_default()),
        None => "None".to_owned(),
    };
    writeln!(file, "\
        #[doc=r#\"The commit time in RFC3339/ISO8601.\"#]\n\
        #[allow(dead_code)]\n\
        pub const GIT_COMMIT_TIMESTAMP: Option<&str> = {commit_time};"
    ).context("Failed to write data to file")?;
    file.flush().context("Failed to flush the build-time info file")?;
    Ok(())
}

/// Returns the HEAD commit time, or `None` when not building from a git checkout
fn commit_timestamp(manifest_dir: &Path) -> Result<Option<String>, ErrorContext> {
    let repo = match Repository::discover(manifest_dir) {
        Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
        Err(e) => return Err(e.context("Failed to open the git repository")),
        Ok(repo) => repo,
    };
    if let Some(git_dir) = repo.path().to_str() {
        println!("cargo:rerun-if-changed={git_dir}HEAD");
    }
    let head = repo
        .head().context("Failed to read repo head")?
        .peel_to_commit().context("Failed to peel reference to commit")?;
    let time = head.time();
    let tz = FixedOffset::east_opt(time.offset_minutes() * 60).context("Commit timestamp had an invalid timezone offset")?;
    let datetime = tz.timestamp_opt(time.seconds(), 0).single().context("Commit timestamp was out of range")?;
    Ok(Some(datetime.to_rfc3339()))
}
