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

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::core::folder::MinecraftLocation;
use crate::core::platform::{PlatformInfo, DELIMITER};
use crate::core::version::{resolve_arguments, AssetIndexContent, ResolvedVersion, Version};
use crate::error::{Error, Result};

use super::options::{LaunchOptions, LaunchVersion, ServerOptions};

/// Appended after the version's own JVM arguments when the caller supplies
/// no `extra_jvm_args`. `-Xmx2G` is skipped once `max_memory` is set.
static DEFAULT_EXTRA_JVM_ARGS: [&str; 7] = [
    "-Xmx2G",
    "-XX:+UnlockExperimentalVMOptions",
    "-XX:+UseG1GC",
    "-XX:G1NewSizePercent=20",
    "-XX:G1ReservePercent=20",
    "-XX:MaxGCPauseMillis=50",
    "-XX:G1HeapRegionSize=32M",
];

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{(.*?)}").expect("placeholder pattern"));

/// The ordered argument vector used to spawn the game.
///
/// The first element is the java executable; spawning and process lifetime
/// stay with the caller.
#[derive(Debug, Clone)]
pub struct LaunchArguments(Vec<String>);

impl LaunchArguments {
    /// Build the client argument vector from the launch options.
    ///
    /// `options.version` may be a bare version id, in which case it is read
    /// from the resource path and resolved here first.
    pub async fn from_launch_options(
        options: &LaunchOptions,
        platform: &PlatformInfo,
    ) -> Result<LaunchArguments> {
        if !options.game_path.is_absolute() {
            return Err(Error::InvalidOptions(
                "game path must be an absolute path".to_string(),
            ));
        }
        let minecraft = MinecraftLocation::new(&options.resource_path);
        let resolved;
        let version = match &options.version {
            LaunchVersion::Id(version_id) => {
                resolved = Version::from_versions_folder(&minecraft, version_id)
                    .await?
                    .resolve(&minecraft, platform)
                    .await?;
                &resolved
            }
            LaunchVersion::Resolved(version) => version.as_ref(),
        };
        info!("generating launch arguments for {}", version.id);

        let mut enabled_features: HashSet<String> = options
            .features
            .iter()
            .filter(|(_, value)| is_truthy(value))
            .map(|(feature, _)| feature.clone())
            .collect();
        if options.is_demo {
            enabled_features.insert("is_demo_user".to_string());
        }
        if options.resolution.is_some() {
            enabled_features.insert("has_custom_resolution".to_string());
        }

        let mut command = Vec::new();
        command.push(options.java_path.display().to_string());

        if platform.name == "osx" {
            command.push(format!("-Xdock:name={}", options.game_name));
            let game_icon = match &options.game_icon {
                Some(icon) => Some(icon.clone()),
                None => lookup_game_icon(&minecraft, &version.assets).await,
            };
            if let Some(game_icon) = game_icon {
                command.push(format!("-Xdock:icon={}", game_icon.display()));
            }
        }

        if let Some(min_memory) = options.min_memory {
            command.push(format!("-Xms{min_memory}M"));
        }
        if let Some(max_memory) = options.max_memory {
            command.push(format!("-Xmx{max_memory}M"));
        }
        if options.ignore_invalid_minecraft_certificates {
            command.push("-Dfml.ignoreInvalidMinecraftCertificates=true".to_string());
        }
        if options.ignore_patch_discrepancies {
            command.push("-Dfml.ignorePatchDiscrepancies=true".to_string());
        }
        if let Some(agent) = &options.yggdrasil_agent {
            command.push(format!(
                "-javaagent:{jar}={server}",
                jar = agent.jar.display(),
                server = agent.server
            ));
            command.push("-Dauthlibinjector.side=client".to_string());
            if let Some(prefetched) = &agent.prefetched {
                command.push(format!(
                    "-Dauthlibinjector.yggdrasil.prefetched={prefetched}"
                ));
            }
        }

        let mut jvm_arguments =
            resolve_arguments(&version.arguments.jvm, platform, &enabled_features);
        if let Some(client_logging) = version.logging.get("client") {
            let log_config = minecraft.get_log_config(&client_logging.file.id);
            if tokio::fs::metadata(&log_config).await.is_ok() {
                jvm_arguments.push(
                    client_logging
                        .argument
                        .replace("${path}", &log_config.display().to_string()),
                );
            }
        }

        let native_root = options
            .native_root
            .clone()
            .unwrap_or_else(|| minecraft.get_natives_root(&version.id));
        let version_name = options
            .version_name
            .clone()
            .unwrap_or_else(|| version.id.clone());

        let mut jvm_options: HashMap<String, String> = HashMap::new();
        jvm_options.insert(
            "natives_directory".to_string(),
            native_root.display().to_string(),
        );
        jvm_options.insert("launcher_name".to_string(), options.launcher_name.clone());
        jvm_options.insert("launcher_version".to_string(), options.launcher_brand.clone());
        jvm_options.insert(
            "classpath".to_string(),
            resolve_classpath(version, &minecraft, &options.extra_class_paths),
        );
        jvm_options.insert(
            "library_directory".to_string(),
            minecraft.libraries.display().to_string(),
        );
        jvm_options.insert("classpath_separator".to_string(), DELIMITER.to_string());
        jvm_options.insert("version_name".to_string(), version_name.clone());
        apply_feature_overrides(&mut jvm_options, &options.features, &enabled_features);
        command.extend(
            jvm_arguments
                .iter()
                .map(|argument| format_placeholders(argument, &jvm_options)),
        );

        match &options.extra_jvm_args {
            Some(extra_jvm_args) => command.extend(extra_jvm_args.iter().cloned()),
            None => {
                for argument in DEFAULT_EXTRA_JVM_ARGS {
                    if argument == "-Xmx2G" && options.max_memory.is_some() {
                        continue;
                    }
                    command.push(argument.to_string());
                }
            }
        }

        command.push(version.main_class.clone());

        let mut game_options: HashMap<String, String> = HashMap::new();
        game_options.insert("version_name".to_string(), version_name);
        game_options.insert(
            "version_type".to_string(),
            options
                .version_type
                .clone()
                .unwrap_or_else(|| version.version_type.clone()),
        );
        game_options.insert(
            "assets_root".to_string(),
            minecraft.assets.display().to_string(),
        );
        game_options.insert(
            "game_assets".to_string(),
            minecraft
                .assets
                .join("virtual")
                .join(&version.assets)
                .display()
                .to_string(),
        );
        game_options.insert("assets_index_name".to_string(), version.assets.clone());
        game_options.insert(
            "game_directory".to_string(),
            options.game_path.display().to_string(),
        );
        game_options.insert(
            "auth_player_name".to_string(),
            options.game_profile.name.clone(),
        );
        game_options.insert("auth_uuid".to_string(), options.game_profile.uuid.clone());
        game_options.insert("auth_access_token".to_string(), options.access_token.clone());
        game_options.insert(
            "user_properties".to_string(),
            serde_json::to_string(&options.properties)?,
        );
        game_options.insert("user_type".to_string(), options.user_type.as_str().to_string());
        let resolution = options.resolution.clone().unwrap_or_default();
        game_options.insert(
            "resolution_width".to_string(),
            resolution
                .width
                .map(|width| width.to_string())
                .unwrap_or_else(|| "-1".to_string()),
        );
        game_options.insert(
            "resolution_height".to_string(),
            resolution
                .height
                .map(|height| height.to_string())
                .unwrap_or_else(|| "-1".to_string()),
        );
        apply_feature_overrides(&mut game_options, &options.features, &enabled_features);

        let game_arguments =
            resolve_arguments(&version.arguments.game, platform, &enabled_features);
        command.extend(
            game_arguments
                .iter()
                .map(|argument| format_placeholders(argument, &game_options)),
        );
        command.extend(options.extra_mc_args.iter().cloned());

        if let Some(server) = &options.server {
            command.push("--server".to_string());
            command.push(server.ip.clone());
            if let Some(port) = server.port {
                command.push("--port".to_string());
                command.push(port.to_string());
            }
        }

        if let Some(resolution) = &options.resolution {
            let has_width = command.iter().any(|argument| argument == "--width");
            if !has_width {
                if resolution.fullscreen {
                    command.push("--fullscreen".to_string());
                } else {
                    if let Some(height) = resolution.height {
                        command.push("--height".to_string());
                        command.push(height.to_string());
                    }
                    if let Some(width) = resolution.width {
                        command.push("--width".to_string());
                        command.push(width.to_string());
                    }
                }
            }
        }

        Ok(LaunchArguments(command))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Turn the argument vector into a ready-to-spawn command with the game
    /// directory as working directory. The caller owns the child process.
    pub fn to_command<P: AsRef<Path>>(&self, game_path: P) -> Result<tokio::process::Command> {
        let (java, arguments) = match self.0.split_first() {
            Some(parts) => parts,
            None => {
                return Err(Error::InvalidOptions(
                    "empty launch argument vector".to_string(),
                ));
            }
        };
        let mut command = tokio::process::Command::new(java);
        command.args(arguments).current_dir(game_path);
        Ok(command)
    }
}

/// Compose the dedicated server argument vector.
///
/// The version must already be resolved; the jar falls back to
/// `versions/{id}/{id}-server.jar` of the effective vanilla version.
pub fn generate_server_arguments(
    version: &ResolvedVersion,
    minecraft: &MinecraftLocation,
    options: &ServerOptions,
) -> Vec<String> {
    let mut command = vec![options.java_path.display().to_string()];
    if let Some(min_memory) = options.min_memory {
        command.push(format!("-Xms{min_memory}M"));
    }
    if let Some(max_memory) = options.max_memory {
        command.push(format!("-Xmx{max_memory}M"));
    }
    command.extend(options.extra_jvm_args.iter().cloned());
    command.push("-jar".to_string());
    let server_jar = options.server_jar.clone().unwrap_or_else(|| {
        minecraft.get_version_jar(&version.minecraft_version, Some("server"))
    });
    command.push(server_jar.display().to_string());
    command.extend(options.extra_mc_args.iter().cloned());
    if options.nogui {
        command.push("nogui".to_string());
    }
    command
}

/// Non-native library paths, then the client jar, then extra entries, joined
/// by the host path-list separator.
fn resolve_classpath(
    version: &ResolvedVersion,
    minecraft: &MinecraftLocation,
    extra_class_paths: &[String],
) -> String {
    let mut classpath = version
        .libraries
        .iter()
        .filter(|library| !library.is_native)
        .map(|library| {
            minecraft
                .get_library_by_path(&library.download.path)
                .display()
                .to_string()
        })
        .collect::<Vec<String>>();
    classpath.push(
        minecraft
            .get_version_jar(&version.minecraft_version, None)
            .display()
            .to_string(),
    );
    classpath.extend(extra_class_paths.iter().cloned());
    classpath.join(DELIMITER)
}

/// Substitute every known `${key}` in one pass; unknown keys stay verbatim.
fn format_placeholders(template: &str, arguments: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            match arguments.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .to_string()
}

/// Enabled features whose value is an object contribute their fields as
/// placeholder overrides. Features apply in name order so the result does
/// not depend on map iteration.
fn apply_feature_overrides(
    placeholders: &mut HashMap<String, String>,
    features: &HashMap<String, Value>,
    enabled_features: &HashSet<String>,
) {
    let mut names = features.keys().collect::<Vec<&String>>();
    names.sort();
    for name in names {
        if !enabled_features.contains(name.as_str()) {
            continue;
        }
        if let Some(overrides) = features[name].as_object() {
            for (key, value) in overrides {
                let value = match value {
                    Value::String(value) => value.clone(),
                    other => other.to_string(),
                };
                placeholders.insert(key.clone(), value);
            }
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(value) => *value,
        Value::Number(number) => number.as_f64().map(|number| number != 0.0).unwrap_or(true),
        Value::String(value) => !value.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

async fn lookup_game_icon(minecraft: &MinecraftLocation, assets: &str) -> Option<PathBuf> {
    let raw = tokio::fs::read_to_string(minecraft.get_assets_index(assets))
        .await
        .ok()?;
    let index: AssetIndexContent = serde_json::from_str(&raw).ok()?;
    let icon = index
        .objects
        .get("icons/minecraft.icns")
        .or_else(|| index.objects.get("minecraft/icons/minecraft.icns"))?;
    Some(minecraft.get_asset(&icon.hash))
}
