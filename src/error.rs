/*
 * Lazurite Launcher Core
 * Copyright (C) 2024 Broken-Deer <old_driver__@outlook.com> and contributors
 *
 * This program is free software, you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// All the ways resolving, diagnosing or launching a version can fail.
///
/// Resolution errors are fatal for the requested version. The diagnoser
/// converts `MissingVersionJson` / `CorruptedVersionJson` into report issues
/// instead of returning them.
#[derive(Debug, Error)]
pub enum Error {
    /// The version json file is not present on disk.
    #[error("version json of {version} not found at {path}")]
    MissingVersionJson { version: String, path: PathBuf },

    /// The version json file exists but is not valid JSON.
    #[error("version json of {version} is not valid JSON")]
    CorruptedVersionJson { version: String, raw: String },

    /// The `inheritsFrom` chain loops back onto itself.
    ///
    /// The chain contains every visited id plus the repeated one,
    /// in walk order.
    #[error("circular version dependencies: {}", .chain.join(" -> "))]
    CircularDependencies { chain: Vec<String> },

    /// The version json parsed but a required field is missing after the
    /// whole inheritance chain was merged.
    #[error("bad version json of {version}: missing {missing}")]
    BadVersionJson { version: String, missing: String },

    /// A library entry has a `downloads` object without an `artifact`.
    #[error("library {library} has no artifact download")]
    LibraryCorruption { library: String },

    /// Legacy `minecraftArguments` and modern `arguments` are mixed across
    /// one inheritance chain.
    #[error("version {version} mixes legacy and modern arguments with {inherits}")]
    FormatMismatch { version: String, inherits: String },

    /// A maven coordinate or library path that cannot be parsed.
    #[error("invalid library name: {0}")]
    InvalidLibraryName(String),

    #[error("invalid launch options: {0}")]
    InvalidOptions(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    JsonParse(#[from] serde_json::Error),
}
