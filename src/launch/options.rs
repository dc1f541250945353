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

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::core::version::ResolvedVersion;

/// The version to launch: either a version id looked up and resolved from
/// the resource path at launch time, or an already resolved version.
#[derive(Debug, Clone)]
pub enum LaunchVersion {
    Id(String),
    Resolved(Box<ResolvedVersion>),
}

impl From<&str> for LaunchVersion {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for LaunchVersion {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<ResolvedVersion> for LaunchVersion {
    fn from(version: ResolvedVersion) -> Self {
        Self::Resolved(Box::new(version))
    }
}

#[derive(Debug, Clone)]
pub struct GameProfile {
    pub name: String,
    pub uuid: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserType {
    Mojang,
    Legacy,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Mojang => "Mojang",
            UserType::Legacy => "Legacy",
        }
    }
}

/// Directly launch to a server.
#[derive(Debug, Clone)]
pub struct Server {
    pub ip: String,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fullscreen: bool,
}

/// Support yushi's yggdrasil agent <https://github.com/to2mbn/authlib-injector/wiki>
#[derive(Debug, Clone)]
pub struct YggdrasilAgent {
    /// The jar file path of the authlib-injector
    pub jar: PathBuf,

    /// The auth server host
    pub server: String,

    /// The prefetched base64
    pub prefetched: Option<String>,
}

#[derive(Debug, Clone)]
/// Launch options for game
pub struct LaunchOptions {
    /// The version of launched Minecraft. Can be either resolved version or
    /// version id
    pub version: LaunchVersion,

    /// User selected game profile.
    ///
    /// For game display name & uuid
    pub game_profile: GameProfile,

    pub access_token: String,
    pub user_type: UserType,

    /// Opaque user properties, JSON-encoded into `${user_properties}`.
    pub properties: BTreeMap<String, Value>,

    pub launcher_name: String,
    pub launcher_brand: String,

    /// Overwrite the version name of the current version.
    ///
    /// If this is absent, it will use version name from resolved version.
    pub version_name: Option<String>,

    /// Overwrite the version type of the current version.
    ///
    /// Some people use this to show fantastic message on the welcome screen.
    pub version_type: Option<String>,

    /// The full path of launched game icon
    ///
    /// Currently, this only supported on MacOS. When absent it is looked up
    /// in the assets index.
    pub game_icon: Option<PathBuf>,

    /// The launched game name
    ///
    /// Currently, this only supported on MacOS.
    pub game_name: String,

    /// The path of parent directory of `saves` / `logs` / `configs` / `mods` / `resourcepacks`
    ///
    /// ### WARN: If it is not an absolute path, the related operation will return `Err()`
    pub game_path: PathBuf,

    /// The path of parent directory of `assets` / `libraries`, like `.minecraft` folder
    pub resource_path: PathBuf,

    /// The java executable file path.
    ///
    /// Not the java home directory!
    pub java_path: PathBuf,

    /// Min memory, this will add a jvm flag -Xms to the command result
    pub min_memory: Option<u32>,

    /// Max memory, this will add a jvm flag -Xmx to the command result
    pub max_memory: Option<u32>,

    /// Directly launch to a server.
    pub server: Option<Server>,

    /// Window resolution. Setting it enables the `has_custom_resolution`
    /// feature.
    pub resolution: Option<Resolution>,

    /// User custom additional java virtual machine command line arguments.
    ///
    /// If this is `None`, the `DEFAULT_EXTRA_JVM_ARGS` will be used.
    pub extra_jvm_args: Option<Vec<String>>,

    /// User custom additional minecraft command line arguments.
    pub extra_mc_args: Vec<String>,

    /// Launch the demo. Enables the `is_demo_user` feature.
    pub is_demo: bool,

    /// Native directory. It's `versions/<version>/<version>-natives` under
    /// the resource path by default.
    pub native_root: Option<PathBuf>,

    /// Add `-Dfml.ignoreInvalidMinecraftCertificates=true` to jvm argument
    pub ignore_invalid_minecraft_certificates: bool,

    /// Add `-Dfml.ignorePatchDiscrepancies=true` to jvm argument
    pub ignore_patch_discrepancies: bool,

    /// Add extra classpath entries after the libraries and the client jar
    pub extra_class_paths: Vec<String>,

    /// Enable features. Truthy values activate the feature for rule
    /// evaluation; object values additionally override placeholders.
    pub features: HashMap<String, Value>,

    pub yggdrasil_agent: Option<YggdrasilAgent>,
}

impl LaunchOptions {
    /// Launch options with the documented defaults: a random `Steve` profile
    /// and access token, resources looked up under the game path.
    pub fn new<V: Into<LaunchVersion>, P: AsRef<Path>>(version: V, game_path: P) -> Self {
        let game_path = game_path.as_ref().to_path_buf();
        Self {
            version: version.into(),
            game_profile: GameProfile {
                name: "Steve".to_string(),
                uuid: uuid::Uuid::new_v4().to_string().replace('-', ""),
            },
            access_token: uuid::Uuid::new_v4().to_string().replace('-', ""),
            user_type: UserType::Mojang,
            properties: BTreeMap::new(),
            launcher_name: "Launcher".to_string(),
            launcher_brand: "0.0.1".to_string(),
            version_name: None,
            version_type: None,
            game_icon: None,
            game_name: "Minecraft".to_string(),
            resource_path: game_path.clone(),
            game_path,
            java_path: Path::new("java").to_path_buf(),
            min_memory: None,
            max_memory: None,
            server: None,
            resolution: None,
            extra_jvm_args: None,
            extra_mc_args: Vec::new(),
            is_demo: false,
            native_root: None,
            ignore_invalid_minecraft_certificates: false,
            ignore_patch_discrepancies: false,
            extra_class_paths: Vec::new(),
            features: HashMap::new(),
            yggdrasil_agent: None,
        }
    }
}

/// Options for composing a dedicated server command line.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub java_path: PathBuf,
    pub min_memory: Option<u32>,
    pub max_memory: Option<u32>,
    pub extra_jvm_args: Vec<String>,
    pub extra_mc_args: Vec<String>,

    /// Launch the server without its console GUI.
    pub nogui: bool,

    /// Explicit server jar path. When absent, `versions/{id}/{id}-server.jar`
    /// of the resolved vanilla version is used.
    pub server_jar: Option<PathBuf>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            java_path: Path::new("java").to_path_buf(),
            min_memory: None,
            max_memory: None,
            extra_jvm_args: Vec::new(),
            extra_mc_args: Vec::new(),
            nogui: false,
            server_jar: None,
        }
    }
}
