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

//! A module for platform information

use serde::{Deserialize, Serialize};

/// The path delimiter character used when joining classpath entries.
///
/// On Windows, this is `";"`, and on other systems it is `":"`.
#[cfg(windows)]
pub const DELIMITER: &str = ";";
#[cfg(not(windows))]
pub const DELIMITER: &str = ":";

/// Platform information including `name`, `version`, `arch`.
///
/// The `name` is the value Minecraft version manifests use in their OS rules:
/// `windows`, `linux`, `osx` or `unknown`.
///
/// # Example
///
/// ```rust
/// use lzl_core::core::platform::PlatformInfo;
///
/// let platform = PlatformInfo::new();
/// println!("{:#?}", platform.name);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PlatformInfo {
    pub name: String,
    pub version: String,
    pub arch: String,
}

impl PlatformInfo {
    /// get the platform information of the running system
    pub fn new() -> Self {
        let info = os_info::get();
        Self {
            name: if cfg!(target_os = "windows") {
                "windows"
            } else if cfg!(target_os = "linux") {
                "linux"
            } else if cfg!(target_os = "macos") {
                "osx"
            } else {
                "unknown"
            }
            .to_string(),
            version: info.version().to_string(),
            arch: if cfg!(target_arch = "x86_64") {
                "x64"
            } else if cfg!(target_arch = "x86") {
                "x86"
            } else if cfg!(target_arch = "mips") {
                "mips"
            } else if cfg!(target_arch = "powerpc") {
                "powerpc"
            } else if cfg!(target_arch = "powerpc64") {
                "powerpc64"
            } else if cfg!(target_arch = "arm") {
                "arm"
            } else if cfg!(target_arch = "aarch64") {
                "arm64"
            } else {
                "unknown"
            }
            .to_string(),
        }
    }
}

impl Default for PlatformInfo {
    fn default() -> Self {
        Self::new()
    }
}
