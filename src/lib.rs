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

//! The launcher core: resolve a version from a `.minecraft` folder, check
//! the installation, and build the command line that starts the game.
//!
//! # Example
//!
//! ```no_run
//! use lzl_core::core::platform::PlatformInfo;
//! use lzl_core::launch::{LaunchArguments, LaunchOptions};
//!
//! async fn fn_name() {
//!     let platform = PlatformInfo::new();
//!     // the version id is resolved from the resource path; a pre-resolved
//!     // version works here too
//!     let options = LaunchOptions::new("1.20.1", "/home/steve/.minecraft");
//!     let arguments = LaunchArguments::from_launch_options(&options, &platform)
//!         .await
//!         .unwrap();
//!     println!("{:#?}", arguments.as_slice());
//! }
//! ```

pub mod core;
pub mod diagnose;
pub mod error;
pub mod launch;
pub mod utils;

pub use error::{Error, Result};
