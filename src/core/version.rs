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
use std::path::PathBuf;
use std::str::FromStr;

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::folder::MinecraftLocation;
use crate::core::library::LibraryInfo;
use crate::core::platform::PlatformInfo;
use crate::error::{Error, Result};

/// A download descriptor. `size == -1` means the size is unknown.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Artifact {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub sha1: String,
    #[serde(default = "unknown_size")]
    pub size: i64,
}

fn unknown_size() -> i64 {
    -1
}

impl Default for Artifact {
    fn default() -> Self {
        Self {
            path: String::new(),
            url: String::new(),
            sha1: String::new(),
            size: -1,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetIndex {
    pub id: String,
    #[serde(default)]
    pub sha1: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "unknown_size")]
    pub size: i64,
    #[serde(default = "unknown_size")]
    pub total_size: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AssetIndexObjectInfo {
    pub hash: String,
    pub size: u64,
}

pub type AssetIndexObject = HashMap<String, AssetIndexObjectInfo>;

/// The content of an `assets/indexes/{id}.json` file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AssetIndexContent {
    pub objects: AssetIndexObject,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Logging {
    pub file: LoggingFile,
    pub argument: String,
    pub r#type: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingFile {
    pub id: String,
    #[serde(default)]
    pub sha1: String,
    #[serde(default = "unknown_size")]
    pub size: i64,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JavaVersion {
    pub component: String,
    pub major_version: i32,
}

impl Default for JavaVersion {
    fn default() -> Self {
        Self {
            component: "jre-legacy".to_string(),
            major_version: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct OsRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Matched against the platform version as an unanchored regex.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Rule {
    pub action: RuleAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<OsRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<HashMap<String, bool>>,
}

/// Check if a list of rules is acceptable in certain OS platform and features.
///
/// An empty list allows. Otherwise the result starts disallowed and the last
/// applicable rule wins.
pub fn check_allowed(
    rules: &[Rule],
    platform: &PlatformInfo,
    enabled_features: &HashSet<String>,
) -> bool {
    if rules.is_empty() {
        return true;
    }
    let mut allow = false;
    for rule in rules {
        if rule_applies(rule, platform, enabled_features) {
            allow = rule.action == RuleAction::Allow;
        }
    }
    allow
}

fn rule_applies(rule: &Rule, platform: &PlatformInfo, enabled_features: &HashSet<String>) -> bool {
    if let Some(os) = &rule.os {
        if let Some(name) = &os.name {
            if name != &platform.name {
                return false;
            }
        }
        if let Some(version) = &os.version {
            let matched = Regex::new(version)
                .map(|regex| regex.is_match(&platform.version))
                .unwrap_or(false);
            if !matched {
                return false;
            }
        }
        if let Some(arch) = &os.arch {
            if arch != &platform.arch {
                return false;
            }
        }
    }
    if let Some(features) = &rule.features {
        for (feature, required) in features {
            if enabled_features.contains(feature) != *required {
                return false;
            }
        }
    }
    true
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ArgumentValue {
    Single(String),
    List(Vec<String>),
}

/// One element of `arguments.jvm` / `arguments.game`: either a plain string
/// or a conditional value guarded by rules.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Argument {
    Plain(String),
    Conditional {
        rules: Vec<Rule>,
        value: ArgumentValue,
    },
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Arguments {
    pub game: Option<Vec<Argument>>,
    pub jvm: Option<Vec<Argument>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolvedArguments {
    pub game: Vec<Argument>,
    pub jvm: Vec<Argument>,
}

/// Flatten argument elements into strings for the given platform and
/// feature set. Conditional entries whose rules fail contribute nothing.
pub fn resolve_arguments(
    arguments: &[Argument],
    platform: &PlatformInfo,
    enabled_features: &HashSet<String>,
) -> Vec<String> {
    let mut result = Vec::with_capacity(arguments.len());
    for argument in arguments {
        match argument {
            Argument::Plain(value) => result.push(value.clone()),
            Argument::Conditional { rules, value } => {
                if !check_allowed(rules, platform, enabled_features) {
                    continue;
                }
                match value {
                    ArgumentValue::Single(value) => result.push(value.clone()),
                    ArgumentValue::List(values) => result.extend(values.iter().cloned()),
                }
            }
        }
    }
    result
}

/// The fixed JVM argument template used for legacy manifests that only carry
/// `minecraftArguments`.
static DEFAULT_JVM_ARGS: Lazy<Vec<Argument>> = Lazy::new(|| {
    vec![
        Argument::Conditional {
            rules: vec![Rule {
                action: RuleAction::Allow,
                os: Some(OsRule {
                    name: Some("windows".to_string()),
                    version: None,
                    arch: None,
                }),
                features: None,
            }],
            value: ArgumentValue::Single(
                "-XX:HeapDumpPath=MojangTricksIntelDriversForPerformance_javaw.exe_minecraft.exe.heapdump"
                    .to_string(),
            ),
        },
        Argument::Conditional {
            rules: vec![Rule {
                action: RuleAction::Allow,
                os: Some(OsRule {
                    name: Some("windows".to_string()),
                    version: Some("^10\\.".to_string()),
                    arch: None,
                }),
                features: None,
            }],
            value: ArgumentValue::List(vec![
                "-Dos.name=Windows 10".to_string(),
                "-Dos.version=10.0".to_string(),
            ]),
        },
        Argument::Plain("-Djava.library.path=${natives_directory}".to_string()),
        Argument::Plain("-Dminecraft.launcher.brand=${launcher_name}".to_string()),
        Argument::Plain("-Dminecraft.launcher.version=${launcher_version}".to_string()),
        Argument::Plain("-cp".to_string()),
        Argument::Plain("${classpath}".to_string()),
    ]
});

/// Merge two legacy `minecraftArguments` strings.
///
/// Tokens pair up as `flag value`. The first value seen for a flag wins,
/// except `--tweakClass` whose values union in order of appearance. A flag
/// that never received a value is dropped.
pub fn mixin_argument_string(head: &str, tail: &str) -> String {
    let mut order: Vec<String> = Vec::new();
    let mut values: HashMap<String, Vec<String>> = HashMap::new();
    for source in [head, tail] {
        let tokens = source
            .split(' ')
            .filter(|token| !token.is_empty())
            .collect::<Vec<&str>>();
        let mut index = 0;
        while index < tokens.len() {
            let flag = tokens[index];
            if !values.contains_key(flag) {
                order.push(flag.to_string());
                values.insert(flag.to_string(), Vec::new());
            }
            if index + 1 < tokens.len() {
                if let Some(flag_values) = values.get_mut(flag) {
                    flag_values.push(tokens[index + 1].to_string());
                }
                index += 2;
            } else {
                index += 1;
            }
        }
    }
    let mut out: Vec<String> = Vec::new();
    for flag in order {
        let flag_values = &values[&flag];
        if flag == "--tweakClass" {
            let mut seen = HashSet::new();
            for value in flag_values {
                if seen.insert(value.clone()) {
                    out.push(flag.clone());
                    out.push(value.clone());
                }
            }
        } else if let Some(first) = flag_values.first() {
            out.push(flag.clone());
            out.push(first.clone());
        }
    }
    out.join(" ")
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Extract {
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct LibraryDownloads {
    pub artifact: Option<Artifact>,
    pub classifiers: Option<HashMap<String, Artifact>>,
}

/// One raw entry of a manifest's `libraries` array. The same shape covers
/// the modern `downloads` form, the natives form and the legacy
/// `checksums`/`url` form.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Library {
    pub name: Option<String>,
    pub rules: Option<Vec<Rule>>,
    pub downloads: Option<LibraryDownloads>,
    pub natives: Option<HashMap<String, String>>,
    pub extract: Option<Extract>,
    pub url: Option<String>,
    pub checksums: Option<Vec<String>>,
    pub serverreq: Option<bool>,
    pub clientreq: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedLibrary {
    pub info: LibraryInfo,
    pub download: Artifact,
    pub is_native: bool,
    pub checksums: Option<Vec<String>>,
    pub serverreq: Option<bool>,
    pub clientreq: Option<bool>,
    pub extract_exclude: Option<Vec<String>>,
}

const MOJANG_LIBRARIES_HOST: &str = "https://libraries.minecraft.net/";
const FORGE_MAVEN_HOST: &str = "https://files.minecraftforge.net/maven/";

impl Library {
    /// Resolve this entry against a platform. `Ok(None)` means the library
    /// does not apply there.
    pub fn resolve(&self, platform: &PlatformInfo) -> Result<Option<ResolvedLibrary>> {
        if let Some(rules) = &self.rules {
            if !check_allowed(rules, platform, &HashSet::new()) {
                return Ok(None);
            }
        }
        let name = match &self.name {
            Some(name) => name.clone(),
            None => return Ok(None),
        };

        if let Some(natives) = &self.natives {
            let classifier_template = match natives.get(&platform.name) {
                Some(classifier) => classifier,
                None => return Ok(None),
            };
            let classifier =
                classifier_template.replace("${arch}", numeric_arch(&platform.arch));
            let info = LibraryInfo::from_name(&name)?.with_classifier(&classifier);
            let download = self
                .downloads
                .as_ref()
                .and_then(|downloads| downloads.classifiers.as_ref())
                .and_then(|classifiers| classifiers.get(&classifier))
                .cloned()
                .unwrap_or_else(|| Artifact {
                    url: format!("{MOJANG_LIBRARIES_HOST}{}", info.path),
                    path: info.path.clone(),
                    sha1: String::new(),
                    size: -1,
                });
            return Ok(Some(ResolvedLibrary {
                info,
                download,
                is_native: true,
                checksums: self.checksums.clone(),
                serverreq: self.serverreq,
                clientreq: self.clientreq,
                extract_exclude: self.extract.as_ref().map(|extract| extract.exclude.clone()),
            }));
        }

        if let Some(downloads) = &self.downloads {
            let artifact = downloads
                .artifact
                .as_ref()
                .ok_or_else(|| Error::LibraryCorruption {
                    library: name.clone(),
                })?;
            let info = LibraryInfo::from_name(&name)?;
            let mut download = artifact.clone();
            if download.path.is_empty() {
                download.path = info.path.clone();
            }
            if download.url.is_empty() {
                download.url = if info.group_id == "net.minecraftforge" {
                    format!("{FORGE_MAVEN_HOST}{}", download.path)
                } else {
                    format!("{MOJANG_LIBRARIES_HOST}{}", download.path)
                };
            }
            let is_native = info.classifier.starts_with("natives");
            return Ok(Some(ResolvedLibrary {
                info,
                download,
                is_native,
                checksums: self.checksums.clone(),
                serverreq: self.serverreq,
                clientreq: self.clientreq,
                extract_exclude: self.extract.as_ref().map(|extract| extract.exclude.clone()),
            }));
        }

        // legacy `url`/`checksums` form used by mod loaders
        let info = match LibraryInfo::from_name(&name) {
            Ok(info) => info,
            Err(_) => return Ok(None),
        };
        let host = self
            .url
            .clone()
            .unwrap_or_else(|| MOJANG_LIBRARIES_HOST.to_string());
        let download = Artifact {
            url: format!("{host}{}", info.path),
            path: info.path.clone(),
            sha1: self
                .checksums
                .as_ref()
                .and_then(|checksums| checksums.first())
                .cloned()
                .unwrap_or_default(),
            size: -1,
        };
        Ok(Some(ResolvedLibrary {
            info,
            download,
            is_native: false,
            checksums: self.checksums.clone(),
            serverreq: self.serverreq,
            clientreq: self.clientreq,
            extract_exclude: self.extract.as_ref().map(|extract| extract.exclude.clone()),
        }))
    }
}

/// `x64` becomes `64`, `x86` becomes `86`, `arm64` stays `arm64`.
fn numeric_arch(arch: &str) -> &str {
    arch.strip_prefix('x').unwrap_or(arch)
}

/// Libraries accumulated while merging an inheritance chain.
///
/// Natives and non-natives occupy disjoint keyspaces (the native key carries
/// the classifier and a trailing `;`), so a native never shadows the common
/// artifact of the same coordinate. Insertion order is kept; a duplicate key
/// overwrites in place so the child wins.
#[derive(Debug, Default)]
struct LibraryCollection {
    order: Vec<String>,
    entries: HashMap<String, ResolvedLibrary>,
}

impl LibraryCollection {
    fn insert(&mut self, library: ResolvedLibrary) {
        let key = if library.is_native {
            format!(
                "{}:{}-{};",
                library.info.group_id, library.info.artifact_id, library.info.classifier
            )
        } else {
            format!("{}:{}", library.info.group_id, library.info.artifact_id)
        };
        if !self.entries.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.entries.insert(key, library);
    }

    fn into_vec(mut self) -> Vec<ResolvedLibrary> {
        let mut common = Vec::new();
        let mut natives = Vec::new();
        for key in &self.order {
            if let Some(library) = self.entries.remove(key) {
                if library.is_native {
                    natives.push(library);
                } else {
                    common.push(library);
                }
            }
        }
        common.extend(natives);
        common
    }
}

struct ManifestArguments {
    jvm: Vec<Argument>,
    game: Vec<Argument>,
    /// Legacy manifests replace the accumulated argument lists instead of
    /// appending to them.
    replace: bool,
}

fn normalize_arguments(version: &Version, platform: &PlatformInfo) -> ManifestArguments {
    if let Some(minecraft_arguments) = &version.minecraft_arguments {
        return ManifestArguments {
            jvm: filter_jvm_arguments(DEFAULT_JVM_ARGS.clone(), platform),
            game: minecraft_arguments
                .split(' ')
                .filter(|token| !token.is_empty())
                .map(|token| Argument::Plain(token.to_string()))
                .collect(),
            replace: true,
        };
    }
    if let Some(arguments) = &version.arguments {
        return ManifestArguments {
            jvm: filter_jvm_arguments(arguments.jvm.clone().unwrap_or_default(), platform),
            game: arguments.game.clone().unwrap_or_default(),
            replace: false,
        };
    }
    ManifestArguments {
        jvm: Vec::new(),
        game: Vec::new(),
        replace: false,
    }
}

/// JVM arguments are settled at resolve time: feature-gated entries are
/// dropped, OS-only conditionals are evaluated and flattened, plain strings
/// pass through.
fn filter_jvm_arguments(arguments: Vec<Argument>, platform: &PlatformInfo) -> Vec<Argument> {
    let no_features = HashSet::new();
    let mut result = Vec::with_capacity(arguments.len());
    for argument in arguments {
        match argument {
            Argument::Plain(_) => result.push(argument),
            Argument::Conditional { rules, value } => {
                if rules.iter().any(|rule| rule.features.is_some()) {
                    continue;
                }
                if !check_allowed(&rules, platform, &no_features) {
                    continue;
                }
                match value {
                    ArgumentValue::Single(value) => result.push(Argument::Plain(value)),
                    ArgumentValue::List(values) => {
                        result.extend(values.into_iter().map(Argument::Plain))
                    }
                }
            }
        }
    }
    result
}

/// Resolved version.json
///
/// This is what the whole inheritance chain merges into. Feed it to the
/// launch argument builder or the diagnoser.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedVersion {
    /// The id of the version, should be identical to the version folder.
    pub id: String,

    /// The effective vanilla version used to locate the client jar.
    pub minecraft_version: String,

    /// The version inheritances of this whole resolved version.
    ///
    /// The first element is this version, and the last element is the root
    /// Minecraft version.
    pub inheritances: Vec<String>,

    /// The version root directories of the chain, in the same order as
    /// `inheritances`.
    pub path_chain: Vec<PathBuf>,

    pub arguments: ResolvedArguments,

    /// The main class full qualified name.
    pub main_class: String,

    /// The asset index id of this version. Should be something like `1.14`, `1.12`.
    pub assets: String,
    pub asset_index: Option<AssetIndex>,

    /// Recommended java version.
    pub java_version: JavaVersion,
    pub version_type: String,
    pub release_time: String,
    pub time: String,
    pub logging: HashMap<String, Logging>,
    pub minimum_launcher_version: i32,
    pub minecraft_directory: PathBuf,

    /// Non-natives first, then natives, deduped with child precedence.
    pub libraries: Vec<ResolvedLibrary>,
    pub downloads: HashMap<String, Artifact>,
}

/// The raw json format provided by Minecraft.
///
/// Use `resolve` to walk the `inheritsFrom` chain and merge it into a
/// [`ResolvedVersion`].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub id: String,
    pub time: Option<String>,
    pub r#type: Option<String>,
    pub release_time: Option<String>,
    pub inherits_from: Option<String>,
    pub minimum_launcher_version: Option<i32>,
    pub minecraft_arguments: Option<String>,
    pub arguments: Option<Arguments>,
    pub main_class: Option<String>,
    pub libraries: Option<Vec<Library>>,
    pub jar: Option<String>,
    pub asset_index: Option<AssetIndex>,
    pub assets: Option<String>,
    pub downloads: Option<HashMap<String, Artifact>>,
    pub logging: Option<HashMap<String, Logging>>,
    pub java_version: Option<JavaVersion>,
    pub client_version: Option<String>,
    #[serde(rename = "_minecraftVersion")]
    pub vanilla_version: Option<String>,
}

impl FromStr for Version {
    type Err = serde_json::Error;
    fn from_str(raw: &str) -> std::result::Result<Version, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl Version {
    pub fn from_value(raw: serde_json::Value) -> std::result::Result<Version, serde_json::Error> {
        serde_json::from_value(raw)
    }

    /// Read `{root}/versions/{id}/{id}.json` and parse it.
    pub async fn from_versions_folder(
        minecraft: &MinecraftLocation,
        version_id: &str,
    ) -> Result<Version> {
        let path = minecraft.get_version_json(version_id);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::MissingVersionJson {
                    version: version_id.to_string(),
                    path,
                });
            }
            Err(error) => return Err(error.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(version) => Ok(version),
            Err(_) => Err(Error::CorruptedVersionJson {
                version: version_id.to_string(),
                raw,
            }),
        }
    }

    /// Walk the `inheritsFrom` chain and merge every manifest into one
    /// self-consistent description of the version.
    pub async fn resolve(
        &self,
        minecraft: &MinecraftLocation,
        platform: &PlatformInfo,
    ) -> Result<ResolvedVersion> {
        let mut chain = vec![self.clone()];
        let mut inheritances = vec![self.id.clone()];
        let mut inherits_from = self.inherits_from.clone();
        while let Some(parent_id) = inherits_from {
            if inheritances.contains(&parent_id) {
                let mut detected = inheritances.clone();
                detected.push(parent_id);
                return Err(Error::CircularDependencies { chain: detected });
            }
            trace!("version {} inherits from {}", self.id, parent_id);
            let parent = Version::from_versions_folder(minecraft, &parent_id).await?;
            inheritances.push(parent_id);
            inherits_from = parent.inherits_from.clone();
            chain.push(parent);
        }
        let path_chain = inheritances
            .iter()
            .map(|id| minecraft.get_version_root(id))
            .collect::<Vec<PathBuf>>();

        // Legacy and modern argument forms must not meet in one chain.
        let mut seen_form: Option<bool> = None;
        for version in &chain {
            let legacy = if version.minecraft_arguments.is_some() {
                true
            } else if version.arguments.is_some() {
                false
            } else {
                continue;
            };
            match seen_form {
                None => seen_form = Some(legacy),
                Some(seen) if seen != legacy => {
                    return Err(Error::FormatMismatch {
                        version: self.id.clone(),
                        inherits: version.id.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        let mut main_class: Option<String> = None;
        let mut assets: Option<String> = None;
        let mut asset_index: Option<AssetIndex> = None;
        let mut version_type: Option<String> = None;
        let mut release_time: Option<String> = None;
        let mut time: Option<String> = None;
        let mut java_version: Option<JavaVersion> = None;
        let mut client_version: Option<String> = None;
        let mut vanilla_version: Option<String> = None;
        let mut logging: HashMap<String, Logging> = HashMap::new();
        let mut downloads: HashMap<String, Artifact> = HashMap::new();
        let mut minimum_launcher_version = 0;
        let mut jvm_args: Vec<Argument> = Vec::new();
        let mut game_args: Vec<Argument> = Vec::new();
        let mut libraries = LibraryCollection::default();

        // Merge from the root of the chain towards the requested child, so
        // the child always wins.
        for version in chain.iter().rev() {
            minimum_launcher_version = std::cmp::max(
                version.minimum_launcher_version.unwrap_or(0),
                minimum_launcher_version,
            );

            let manifest_arguments = normalize_arguments(version, platform);
            if manifest_arguments.replace {
                jvm_args = manifest_arguments.jvm;
                game_args = manifest_arguments.game;
            } else {
                jvm_args.extend(manifest_arguments.jvm);
                game_args.extend(manifest_arguments.game);
            }

            if version.main_class.is_some() {
                main_class = version.main_class.clone();
            }
            if version.assets.is_some() {
                assets = version.assets.clone();
            }
            if version.asset_index.is_some() {
                asset_index = version.asset_index.clone();
            }
            if version.r#type.is_some() {
                version_type = version.r#type.clone();
            }
            if version.release_time.is_some() {
                release_time = version.release_time.clone();
            }
            if version.time.is_some() {
                time = version.time.clone();
            }
            if version.java_version.is_some() {
                java_version = version.java_version.clone();
            }
            if version.client_version.is_some() {
                client_version = version.client_version.clone();
            }
            if version.vanilla_version.is_some() {
                vanilla_version = version.vanilla_version.clone();
            }
            if let Some(version_logging) = &version.logging {
                if !version_logging.is_empty() {
                    logging = version_logging.clone();
                }
            }
            if let Some(version_downloads) = &version.downloads {
                downloads.extend(version_downloads.clone());
            }
            if let Some(version_libraries) = &version.libraries {
                for library in version_libraries {
                    if let Some(resolved) = library.resolve(platform)? {
                        libraries.insert(resolved);
                    }
                }
            }
        }

        let main_class = match main_class {
            Some(main_class) if !main_class.is_empty() => main_class,
            _ => {
                return Err(Error::BadVersionJson {
                    version: self.id.clone(),
                    missing: "mainClass".to_string(),
                });
            }
        };
        let root_id = inheritances
            .last()
            .cloned()
            .unwrap_or_else(|| self.id.clone());

        Ok(ResolvedVersion {
            id: self.id.clone(),
            minecraft_version: client_version.or(vanilla_version).unwrap_or(root_id),
            inheritances,
            path_chain,
            arguments: ResolvedArguments {
                game: game_args,
                jvm: jvm_args,
            },
            main_class,
            assets: assets.unwrap_or_default(),
            asset_index,
            java_version: java_version.unwrap_or_default(),
            version_type: version_type.unwrap_or_default(),
            release_time: release_time.unwrap_or_default(),
            time: time.unwrap_or_default(),
            logging,
            minimum_launcher_version,
            minecraft_directory: minecraft.root.clone(),
            libraries: libraries.into_vec(),
            downloads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux_platform() -> PlatformInfo {
        PlatformInfo {
            name: "linux".to_string(),
            version: "6.1.0".to_string(),
            arch: "x64".to_string(),
        }
    }

    fn windows10_platform() -> PlatformInfo {
        PlatformInfo {
            name: "windows".to_string(),
            version: "10.0.19045".to_string(),
            arch: "x64".to_string(),
        }
    }

    fn temp_minecraft() -> MinecraftLocation {
        let root = std::env::temp_dir().join(format!("lzl-version-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).unwrap();
        MinecraftLocation::new(&root)
    }

    fn write_version_json(minecraft: &MinecraftLocation, id: &str, raw: &str) {
        let path = minecraft.get_version_json(id);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, raw).unwrap();
    }

    fn allow(os: Option<OsRule>, features: Option<HashMap<String, bool>>) -> Rule {
        Rule {
            action: RuleAction::Allow,
            os,
            features,
        }
    }

    fn disallow(os: Option<OsRule>, features: Option<HashMap<String, bool>>) -> Rule {
        Rule {
            action: RuleAction::Disallow,
            os,
            features,
        }
    }

    #[test]
    fn empty_rules_allow() {
        assert!(check_allowed(&[], &linux_platform(), &HashSet::new()));
    }

    #[test]
    fn unconstrained_rules_apply_as_written() {
        let platform = linux_platform();
        assert!(check_allowed(&[allow(None, None)], &platform, &HashSet::new()));
        assert!(!check_allowed(
            &[disallow(None, None)],
            &platform,
            &HashSet::new()
        ));
    }

    #[test]
    fn last_applicable_rule_wins() {
        let platform = linux_platform();
        let rules = vec![
            allow(None, None),
            disallow(
                Some(OsRule {
                    name: Some("linux".to_string()),
                    ..OsRule::default()
                }),
                None,
            ),
        ];
        assert!(!check_allowed(&rules, &platform, &HashSet::new()));
        // the same disallow does not apply on another platform
        assert!(check_allowed(&rules, &windows10_platform(), &HashSet::new()));
    }

    #[test]
    fn os_version_is_matched_as_regex() {
        let rules = vec![allow(
            Some(OsRule {
                name: Some("windows".to_string()),
                version: Some("^10\\.".to_string()),
                ..OsRule::default()
            }),
            None,
        )];
        assert!(check_allowed(&rules, &windows10_platform(), &HashSet::new()));
        let old_windows = PlatformInfo {
            name: "windows".to_string(),
            version: "6.1".to_string(),
            arch: "x64".to_string(),
        };
        assert!(!check_allowed(&rules, &old_windows, &HashSet::new()));
    }

    #[test]
    fn feature_rules_check_membership_both_ways() {
        let platform = linux_platform();
        let mut features = HashMap::new();
        features.insert("is_demo_user".to_string(), true);
        let rules = vec![allow(None, Some(features.clone()))];
        let mut enabled = HashSet::new();
        assert!(!check_allowed(&rules, &platform, &enabled));
        enabled.insert("is_demo_user".to_string());
        assert!(check_allowed(&rules, &platform, &enabled));

        let mut forbidden = HashMap::new();
        forbidden.insert("is_demo_user".to_string(), false);
        let rules = vec![allow(None, Some(forbidden))];
        assert!(!check_allowed(&rules, &platform, &enabled));
    }

    #[test]
    fn arguments_flatten_with_rules() {
        let arguments = vec![
            Argument::Plain("--username".to_string()),
            Argument::Conditional {
                rules: vec![allow(
                    Some(OsRule {
                        name: Some("osx".to_string()),
                        ..OsRule::default()
                    }),
                    None,
                )],
                value: ArgumentValue::Single("-XstartOnFirstThread".to_string()),
            },
            Argument::Conditional {
                rules: vec![allow(None, None)],
                value: ArgumentValue::List(vec!["--width".to_string(), "854".to_string()]),
            },
        ];
        let resolved = resolve_arguments(&arguments, &linux_platform(), &HashSet::new());
        assert_eq!(resolved, vec!["--username", "--width", "854"]);
    }

    #[test]
    fn mixin_keeps_first_value_but_unions_tweak_classes() {
        let mixed = mixin_argument_string(
            "--username ${auth_player_name} --tweakClass forge",
            "--username other --tweakClass optifine --gameDir ${game_directory}",
        );
        assert_eq!(
            mixed,
            "--username ${auth_player_name} --tweakClass forge --tweakClass optifine --gameDir ${game_directory}"
        );
    }

    #[test]
    fn native_classifier_substitutes_numeric_arch() {
        let raw: Library = serde_json::from_str(
            r#"{
                "name": "org.lwjgl.lwjgl:lwjgl-platform:2.9.4",
                "natives": {
                    "windows": "natives-windows-${arch}",
                    "linux": "natives-linux"
                }
            }"#,
        )
        .unwrap();
        let resolved = raw.resolve(&windows10_platform()).unwrap().unwrap();
        assert!(resolved.is_native);
        assert_eq!(resolved.info.classifier, "natives-windows-64");
        assert_eq!(
            resolved.download.path,
            "org/lwjgl/lwjgl/lwjgl-platform/2.9.4/lwjgl-platform-2.9.4-natives-windows-64.jar"
        );
        assert_eq!(
            resolved.download.url,
            "https://libraries.minecraft.net/org/lwjgl/lwjgl/lwjgl-platform/2.9.4/lwjgl-platform-2.9.4-natives-windows-64.jar"
        );
        assert_eq!(resolved.download.size, -1);

        // arm64 has no leading x to strip
        assert_eq!(numeric_arch("arm64"), "arm64");
        assert_eq!(numeric_arch("x86"), "86");
    }

    #[test]
    fn native_library_prefers_declared_classifier_artifact() {
        let raw: Library = serde_json::from_str(
            r#"{
                "name": "org.lwjgl.lwjgl:lwjgl-platform:2.9.4",
                "natives": { "linux": "natives-linux" },
                "downloads": {
                    "classifiers": {
                        "natives-linux": {
                            "path": "org/lwjgl/lwjgl/lwjgl-platform/2.9.4/lwjgl-platform-2.9.4-natives-linux.jar",
                            "url": "https://libraries.minecraft.net/x.jar",
                            "sha1": "abc",
                            "size": 10
                        }
                    }
                },
                "extract": { "exclude": ["META-INF/"] }
            }"#,
        )
        .unwrap();
        let resolved = raw.resolve(&linux_platform()).unwrap().unwrap();
        assert!(resolved.is_native);
        assert_eq!(resolved.download.sha1, "abc");
        assert_eq!(resolved.extract_exclude, Some(vec!["META-INF/".to_string()]));
        // the same entry does not apply on a platform missing from `natives`
        assert!(raw.resolve(&windows10_platform()).unwrap().is_none());
    }

    #[test]
    fn modern_library_without_artifact_is_corruption() {
        let raw: Library = serde_json::from_str(
            r#"{ "name": "com.example:broken:1.0", "downloads": {} }"#,
        )
        .unwrap();
        match raw.resolve(&linux_platform()) {
            Err(Error::LibraryCorruption { library }) => {
                assert_eq!(library, "com.example:broken:1.0")
            }
            other => panic!("expected LibraryCorruption, got {other:?}"),
        }
    }

    #[test]
    fn forge_group_gets_the_forge_maven_host() {
        let raw: Library = serde_json::from_str(
            r#"{
                "name": "net.minecraftforge:forge:1.19-41.0.0",
                "downloads": {
                    "artifact": {
                        "path": "net/minecraftforge/forge/1.19-41.0.0/forge-1.19-41.0.0.jar",
                        "url": "",
                        "sha1": "",
                        "size": -1
                    }
                }
            }"#,
        )
        .unwrap();
        let resolved = raw.resolve(&linux_platform()).unwrap().unwrap();
        assert_eq!(
            resolved.download.url,
            "https://files.minecraftforge.net/maven/net/minecraftforge/forge/1.19-41.0.0/forge-1.19-41.0.0.jar"
        );
    }

    #[test]
    fn legacy_library_builds_from_url_and_checksums() {
        let raw: Library = serde_json::from_str(
            r#"{
                "name": "net.fabricmc:tiny-mappings-parser:0.3.0",
                "url": "https://maven.fabricmc.net/",
                "checksums": ["cafebabe"],
                "clientreq": true,
                "serverreq": false
            }"#,
        )
        .unwrap();
        let resolved = raw.resolve(&linux_platform()).unwrap().unwrap();
        assert!(!resolved.is_native);
        assert_eq!(
            resolved.download.url,
            "https://maven.fabricmc.net/net/fabricmc/tiny-mappings-parser/0.3.0/tiny-mappings-parser-0.3.0.jar"
        );
        assert_eq!(resolved.download.sha1, "cafebabe");
        assert_eq!(resolved.download.size, -1);
        assert_eq!(resolved.clientreq, Some(true));
        assert_eq!(resolved.serverreq, Some(false));
    }

    const VANILLA_MODERN: &str = r#"{
        "id": "1.20.1",
        "type": "release",
        "time": "2023-06-12T13:25:51+00:00",
        "releaseTime": "2023-06-12T13:25:51+00:00",
        "mainClass": "net.minecraft.client.main.Main",
        "minimumLauncherVersion": 21,
        "assets": "5",
        "assetIndex": {
            "id": "5",
            "sha1": "2d58149bfa508105c4e902a04fa6634f2cc2d13c",
            "size": 412809,
            "totalSize": 622908416,
            "url": "https://piston-meta.mojang.com/v1/packages/2d58149bfa508105c4e902a04fa6634f2cc2d13c/5.json"
        },
        "downloads": {
            "client": {
                "sha1": "0c3ec587af28e5a785c0b4a7b8a30f9a8f78f838",
                "size": 24476830,
                "url": "https://piston-data.mojang.com/v1/objects/0c3ec587af28e5a785c0b4a7b8a30f9a8f78f838/client.jar"
            }
        },
        "javaVersion": { "component": "java-runtime-gamma", "majorVersion": 17 },
        "arguments": {
            "game": [
                "--username", "${auth_player_name}",
                "--version", "${version_name}",
                {
                    "rules": [
                        { "action": "allow", "features": { "is_demo_user": true } }
                    ],
                    "value": "--demo"
                },
                {
                    "rules": [
                        { "action": "allow", "features": { "has_custom_resolution": true } }
                    ],
                    "value": ["--width", "${resolution_width}", "--height", "${resolution_height}"]
                }
            ],
            "jvm": [
                {
                    "rules": [
                        { "action": "allow", "os": { "name": "osx" } }
                    ],
                    "value": ["-XstartOnFirstThread"]
                },
                {
                    "rules": [
                        { "action": "allow", "os": { "name": "windows" } }
                    ],
                    "value": "-XX:HeapDumpPath=MojangTricksIntelDriversForPerformance_javaw.exe_minecraft.exe.heapdump"
                },
                "-Djava.library.path=${natives_directory}",
                "-cp", "${classpath}"
            ]
        },
        "libraries": [
            {
                "name": "com.mojang:logging:1.1.1",
                "downloads": {
                    "artifact": {
                        "path": "com/mojang/logging/1.1.1/logging-1.1.1.jar",
                        "sha1": "832b8e6674a9b325a5175a3a6267dfaf34c85139",
                        "size": 15343,
                        "url": "https://libraries.minecraft.net/com/mojang/logging/1.1.1/logging-1.1.1.jar"
                    }
                }
            },
            {
                "name": "org.lwjgl:lwjgl:3.3.1",
                "downloads": {
                    "artifact": {
                        "path": "org/lwjgl/lwjgl/3.3.1/lwjgl-3.3.1.jar",
                        "sha1": "ae58664f88e18a9bb2c77b063833ca7aaec484cb",
                        "size": 724243,
                        "url": "https://libraries.minecraft.net/org/lwjgl/lwjgl/3.3.1/lwjgl-3.3.1.jar"
                    }
                }
            },
            {
                "name": "org.lwjgl:lwjgl:3.3.1",
                "downloads": {
                    "classifiers": {
                        "natives-linux": {
                            "path": "org/lwjgl/lwjgl/3.3.1/lwjgl-3.3.1-natives-linux.jar",
                            "sha1": "1de885aba434f934201b99f2f1afb142036ac189",
                            "size": 110704,
                            "url": "https://libraries.minecraft.net/org/lwjgl/lwjgl/3.3.1/lwjgl-3.3.1-natives-linux.jar"
                        }
                    }
                },
                "natives": { "linux": "natives-linux" }
            },
            {
                "name": "org.apple:applewin:1.0",
                "rules": [ { "action": "allow", "os": { "name": "osx" } } ],
                "downloads": {
                    "artifact": {
                        "path": "org/apple/applewin/1.0/applewin-1.0.jar",
                        "sha1": "",
                        "size": 1,
                        "url": "https://libraries.minecraft.net/org/apple/applewin/1.0/applewin-1.0.jar"
                    }
                }
            }
        ]
    }"#;

    #[tokio::test]
    async fn resolves_a_single_modern_version() {
        let minecraft = temp_minecraft();
        write_version_json(&minecraft, "1.20.1", VANILLA_MODERN);
        let platform = linux_platform();
        let version = Version::from_versions_folder(&minecraft, "1.20.1")
            .await
            .unwrap();
        let resolved = version.resolve(&minecraft, &platform).await.unwrap();

        assert_eq!(resolved.id, "1.20.1");
        assert_eq!(resolved.minecraft_version, "1.20.1");
        assert_eq!(resolved.main_class, "net.minecraft.client.main.Main");
        assert_eq!(resolved.inheritances, vec!["1.20.1".to_string()]);
        assert_eq!(resolved.path_chain, vec![minecraft.get_version_root("1.20.1")]);
        assert_eq!(resolved.java_version.major_version, 17);
        assert_eq!(resolved.minimum_launcher_version, 21);

        // the osx-only library is filtered out, the native split in two keyspaces
        let names = resolved
            .libraries
            .iter()
            .map(|library| library.info.name.as_str())
            .collect::<Vec<&str>>();
        assert_eq!(
            names,
            vec![
                "com.mojang:logging:1.1.1",
                "org.lwjgl:lwjgl:3.3.1",
                "org.lwjgl:lwjgl:3.3.1:natives-linux"
            ]
        );
        assert!(resolved.libraries[2].is_native);
        assert!(!resolved.libraries[1].is_native);

        // jvm conditionals were settled for linux, game conditionals survive
        let jvm = resolve_arguments(&resolved.arguments.jvm, &platform, &HashSet::new());
        assert_eq!(
            jvm,
            vec!["-Djava.library.path=${natives_directory}", "-cp", "${classpath}"]
        );
        assert!(resolved
            .arguments
            .game
            .iter()
            .any(|argument| matches!(argument, Argument::Conditional { .. })));
    }

    #[tokio::test]
    async fn inherited_version_merges_with_child_precedence() {
        let minecraft = temp_minecraft();
        write_version_json(&minecraft, "1.20.1", VANILLA_MODERN);
        write_version_json(
            &minecraft,
            "1.20.1-forge-47.1.0",
            r#"{
                "id": "1.20.1-forge-47.1.0",
                "inheritsFrom": "1.20.1",
                "type": "release",
                "mainClass": "cpw.mods.bootstraplauncher.BootstrapLauncher",
                "arguments": {
                    "game": ["--launchTarget", "forgeclient"],
                    "jvm": ["-Dforge.enabled=true"]
                },
                "libraries": [
                    {
                        "name": "com.mojang:logging:9.9.9",
                        "downloads": {
                            "artifact": {
                                "path": "com/mojang/logging/9.9.9/logging-9.9.9.jar",
                                "sha1": "ffffffffffffffffffffffffffffffffffffffff",
                                "size": 1,
                                "url": "https://libraries.minecraft.net/com/mojang/logging/9.9.9/logging-9.9.9.jar"
                            }
                        }
                    }
                ]
            }"#,
        );
        let platform = linux_platform();
        let version = Version::from_versions_folder(&minecraft, "1.20.1-forge-47.1.0")
            .await
            .unwrap();
        let resolved = version.resolve(&minecraft, &platform).await.unwrap();

        assert_eq!(
            resolved.inheritances,
            vec!["1.20.1-forge-47.1.0".to_string(), "1.20.1".to_string()]
        );
        assert_eq!(resolved.main_class, "cpw.mods.bootstraplauncher.BootstrapLauncher");
        assert_eq!(resolved.minecraft_version, "1.20.1");

        // child libraries overwrite the parent entry for the same coordinate
        let logging = resolved
            .libraries
            .iter()
            .filter(|library| library.info.artifact_id == "logging")
            .collect::<Vec<_>>();
        assert_eq!(logging.len(), 1);
        assert_eq!(logging[0].info.version, "9.9.9");

        // arguments append parent first, child last
        let game = resolve_arguments(&resolved.arguments.game, &platform, &HashSet::new());
        let username_position = game.iter().position(|arg| arg == "--username").unwrap();
        let target_position = game.iter().position(|arg| arg == "--launchTarget").unwrap();
        assert!(username_position < target_position);
        let jvm = resolve_arguments(&resolved.arguments.jvm, &platform, &HashSet::new());
        assert!(jvm.contains(&"-Dforge.enabled=true".to_string()));
        // the client download comes from the parent
        assert!(resolved.downloads.contains_key("client"));
    }

    #[tokio::test]
    async fn legacy_version_uses_the_default_jvm_template() {
        let minecraft = temp_minecraft();
        write_version_json(
            &minecraft,
            "1.7.10",
            r#"{
                "id": "1.7.10",
                "type": "release",
                "mainClass": "net.minecraft.client.main.Main",
                "minecraftArguments": "--username ${auth_player_name} --version ${version_name} --gameDir ${game_directory}",
                "assets": "1.7.10",
                "downloads": { "client": { "sha1": "abc", "size": 1, "url": "https://example.com/client.jar" } },
                "libraries": []
            }"#,
        );
        let platform = linux_platform();
        let version = Version::from_versions_folder(&minecraft, "1.7.10")
            .await
            .unwrap();
        let resolved = version.resolve(&minecraft, &platform).await.unwrap();

        let game = resolve_arguments(&resolved.arguments.game, &platform, &HashSet::new());
        assert_eq!(
            game,
            vec![
                "--username",
                "${auth_player_name}",
                "--version",
                "${version_name}",
                "--gameDir",
                "${game_directory}"
            ]
        );
        // windows-only entries of the template were dropped for linux
        let jvm = resolve_arguments(&resolved.arguments.jvm, &platform, &HashSet::new());
        assert_eq!(
            jvm,
            vec![
                "-Djava.library.path=${natives_directory}",
                "-Dminecraft.launcher.brand=${launcher_name}",
                "-Dminecraft.launcher.version=${launcher_version}",
                "-cp",
                "${classpath}"
            ]
        );
    }

    #[tokio::test]
    async fn legacy_child_replaces_parent_arguments() {
        let minecraft = temp_minecraft();
        write_version_json(
            &minecraft,
            "1.7.10",
            r#"{
                "id": "1.7.10",
                "mainClass": "net.minecraft.client.main.Main",
                "minecraftArguments": "--username ${auth_player_name}",
                "libraries": []
            }"#,
        );
        write_version_json(
            &minecraft,
            "1.7.10-forge",
            r#"{
                "id": "1.7.10-forge",
                "inheritsFrom": "1.7.10",
                "mainClass": "net.minecraft.launchwrapper.Launch",
                "minecraftArguments": "--username ${auth_player_name} --tweakClass cpw.mods.fml.common.launcher.FMLTweaker",
                "libraries": []
            }"#,
        );
        let platform = linux_platform();
        let version = Version::from_versions_folder(&minecraft, "1.7.10-forge")
            .await
            .unwrap();
        let resolved = version.resolve(&minecraft, &platform).await.unwrap();
        let game = resolve_arguments(&resolved.arguments.game, &platform, &HashSet::new());
        assert_eq!(
            game,
            vec![
                "--username",
                "${auth_player_name}",
                "--tweakClass",
                "cpw.mods.fml.common.launcher.FMLTweaker"
            ]
        );
    }

    #[tokio::test]
    async fn circular_inheritance_is_detected() {
        let minecraft = temp_minecraft();
        write_version_json(
            &minecraft,
            "A",
            r#"{ "id": "A", "inheritsFrom": "B", "mainClass": "a.Main", "libraries": [] }"#,
        );
        write_version_json(
            &minecraft,
            "B",
            r#"{ "id": "B", "inheritsFrom": "A", "mainClass": "b.Main", "libraries": [] }"#,
        );
        let version = Version::from_versions_folder(&minecraft, "A").await.unwrap();
        match version.resolve(&minecraft, &linux_platform()).await {
            Err(Error::CircularDependencies { chain }) => {
                assert_eq!(chain, vec!["A".to_string(), "B".to_string(), "A".to_string()]);
            }
            other => panic!("expected CircularDependencies, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn mixed_argument_formats_across_a_chain_fail() {
        let minecraft = temp_minecraft();
        write_version_json(&minecraft, "1.20.1", VANILLA_MODERN);
        write_version_json(
            &minecraft,
            "broken-child",
            r#"{
                "id": "broken-child",
                "inheritsFrom": "1.20.1",
                "mainClass": "b.Main",
                "minecraftArguments": "--username x",
                "libraries": []
            }"#,
        );
        let version = Version::from_versions_folder(&minecraft, "broken-child")
            .await
            .unwrap();
        match version.resolve(&minecraft, &linux_platform()).await {
            Err(Error::FormatMismatch { version, inherits }) => {
                assert_eq!(version, "broken-child");
                assert_eq!(inherits, "1.20.1");
            }
            other => panic!("expected FormatMismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_main_class_is_a_bad_version_json() {
        let minecraft = temp_minecraft();
        write_version_json(
            &minecraft,
            "no-main",
            r#"{ "id": "no-main", "libraries": [] }"#,
        );
        let version = Version::from_versions_folder(&minecraft, "no-main")
            .await
            .unwrap();
        match version.resolve(&minecraft, &linux_platform()).await {
            Err(Error::BadVersionJson { version, missing }) => {
                assert_eq!(version, "no-main");
                assert_eq!(missing, "mainClass");
            }
            other => panic!("expected BadVersionJson, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_and_corrupted_version_jsons_are_distinguished() {
        let minecraft = temp_minecraft();
        match Version::from_versions_folder(&minecraft, "nope").await {
            Err(Error::MissingVersionJson { version, path }) => {
                assert_eq!(version, "nope");
                assert_eq!(path, minecraft.get_version_json("nope"));
            }
            other => panic!("expected MissingVersionJson, got {other:?}"),
        }
        write_version_json(&minecraft, "garbled", "{ not json");
        match Version::from_versions_folder(&minecraft, "garbled").await {
            Err(Error::CorruptedVersionJson { version, raw }) => {
                assert_eq!(version, "garbled");
                assert_eq!(raw, "{ not json");
            }
            other => panic!("expected CorruptedVersionJson, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn client_version_overrides_the_vanilla_jar_lookup() {
        let minecraft = temp_minecraft();
        write_version_json(
            &minecraft,
            "patched",
            r#"{
                "id": "patched",
                "mainClass": "net.minecraft.client.main.Main",
                "clientVersion": "1.20.1",
                "arguments": { "game": [], "jvm": [] },
                "libraries": []
            }"#,
        );
        let version = Version::from_versions_folder(&minecraft, "patched")
            .await
            .unwrap();
        let resolved = version.resolve(&minecraft, &linux_platform()).await.unwrap();
        assert_eq!(resolved.minecraft_version, "1.20.1");
        assert_eq!(resolved.id, "patched");
    }
}
