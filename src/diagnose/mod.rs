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

//! Check a local installation against its resolved version description.
//!
//! # Example
//!
//! ```no_run
//! use lzl_core::core::folder::MinecraftLocation;
//! use lzl_core::core::platform::PlatformInfo;
//! use lzl_core::diagnose::{diagnose, DiagnoseOptions};
//!
//! async fn fn_name() {
//!     let minecraft = MinecraftLocation::new(".minecraft");
//!     let platform = PlatformInfo::new();
//!     let report = diagnose("1.20.1", &minecraft, &platform, &DiagnoseOptions::default())
//!         .await
//!         .unwrap();
//!     for issue in report.issues {
//!         println!("{:?} {:?}: {}", issue.kind, issue.file, issue.hint);
//!     }
//! }
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use log::trace;
use serde::Serialize;

use crate::core::folder::MinecraftLocation;
use crate::core::platform::PlatformInfo;
use crate::core::version::{AssetIndexContent, AssetIndexObjectInfo, ResolvedLibrary, Version};
use crate::error::{Error, Result};
use crate::utils::sha1::calculate_sha1_from_file;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum IssueKind {
    Missing,
    Corrupted,
}

/// What a problematic file is to the installation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum IssueRole {
    VersionJson { version: String },
    MinecraftJar { version: String },
    AssetIndex { assets: String },
    Asset { name: String },
    Library { name: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub role: IssueRole,
    pub file: PathBuf,
    pub expected_checksum: String,
    pub received_checksum: String,
    pub hint: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnoseReport {
    pub minecraft_location: MinecraftLocation,
    pub version: String,
    pub issues: Vec<Issue>,
}

/// Cooperative cancellation for a diagnose run. Checks poll it between I/O
/// steps; a cancelled in-flight check reports no issue.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiagnoseOptions {
    /// Strict mode hashes every asset unconditionally, but for libraries
    /// hashes only when the declared size is known and the on-disk size
    /// differs. Non-strict hashes every library and stats assets first.
    pub strict: bool,
    pub cancel: CancelToken,
}

/// Verify the client jar, the asset index, every asset object and every
/// resolved library of a version.
///
/// A version json that is missing or unreadable short-circuits into a
/// single-issue report. Everything else is collected, never thrown.
pub async fn diagnose(
    version_id: &str,
    minecraft: &MinecraftLocation,
    platform: &PlatformInfo,
    options: &DiagnoseOptions,
) -> Result<DiagnoseReport> {
    let mut issues: Vec<Issue> = Vec::new();
    let report = |issues: Vec<Issue>| DiagnoseReport {
        minecraft_location: minecraft.clone(),
        version: version_id.to_string(),
        issues,
    };

    let loaded = match Version::from_versions_folder(minecraft, version_id).await {
        Ok(version) => version.resolve(minecraft, platform).await,
        Err(error) => Err(error),
    };
    let resolved = match loaded {
        Ok(resolved) => resolved,
        Err(Error::MissingVersionJson { version, path }) => {
            issues.push(Issue {
                kind: IssueKind::Missing,
                role: IssueRole::VersionJson { version },
                file: path,
                expected_checksum: String::new(),
                received_checksum: String::new(),
                hint: "the version json is absent, reinstall the version".to_string(),
            });
            return Ok(report(issues));
        }
        Err(Error::CorruptedVersionJson { version, .. }) => {
            issues.push(Issue {
                kind: IssueKind::Corrupted,
                role: IssueRole::VersionJson {
                    version: version.clone(),
                },
                file: minecraft.get_version_json(&version),
                expected_checksum: String::new(),
                received_checksum: String::new(),
                hint: "the version json is not parseable, reinstall the version".to_string(),
            });
            return Ok(report(issues));
        }
        Err(other) => return Err(other),
    };
    trace!("diagnosing {} at {:?}", resolved.id, minecraft.root);

    if options.cancel.is_cancelled() {
        return Ok(report(issues));
    }

    let jar_expected = resolved
        .downloads
        .get("client")
        .map(|artifact| artifact.sha1.clone())
        .unwrap_or_default();
    if let Some(issue) = diagnose_file(
        minecraft.get_version_jar(&resolved.minecraft_version, None),
        &jar_expected,
        IssueRole::MinecraftJar {
            version: resolved.minecraft_version.clone(),
        },
        "the client jar is damaged, redownload it",
        &options.cancel,
    )
    .await?
    {
        issues.push(issue);
    }

    let mut asset_index_intact = false;
    if !resolved.assets.is_empty() {
        let index_file = minecraft.get_assets_index(&resolved.assets);
        let index_expected = resolved
            .asset_index
            .as_ref()
            .map(|index| index.sha1.clone())
            .unwrap_or_default();
        match diagnose_file(
            index_file.clone(),
            &index_expected,
            IssueRole::AssetIndex {
                assets: resolved.assets.clone(),
            },
            "the asset index is damaged, redownload it",
            &options.cancel,
        )
        .await?
        {
            Some(issue) => issues.push(issue),
            None => asset_index_intact = tokio::fs::metadata(&index_file).await.is_ok(),
        }
    }

    let library_results = futures::stream::iter(resolved.libraries.iter())
        .map(|library| {
            let cancel = options.cancel.clone();
            let strict = options.strict;
            async move { diagnose_library(library, minecraft, strict, &cancel).await }
        })
        .buffer_unordered(num_cpus::get())
        .collect::<Vec<Result<Option<Issue>>>>()
        .await;
    for result in library_results {
        if let Some(issue) = result? {
            issues.push(issue);
        }
    }

    if asset_index_intact && !options.cancel.is_cancelled() {
        let index_file = minecraft.get_assets_index(&resolved.assets);
        let raw = tokio::fs::read_to_string(&index_file).await?;
        match serde_json::from_str::<AssetIndexContent>(&raw) {
            Err(_) => issues.push(Issue {
                kind: IssueKind::Corrupted,
                role: IssueRole::AssetIndex {
                    assets: resolved.assets.clone(),
                },
                file: index_file,
                expected_checksum: String::new(),
                received_checksum: String::new(),
                hint: "the asset index is not valid JSON, redownload it".to_string(),
            }),
            Ok(index) => {
                let asset_results = futures::stream::iter(index.objects.into_iter())
                    .map(|(name, object)| {
                        let cancel = options.cancel.clone();
                        let strict = options.strict;
                        async move { diagnose_asset(name, object, minecraft, strict, &cancel).await }
                    })
                    .buffer_unordered(num_cpus::get())
                    .collect::<Vec<Result<Option<Issue>>>>()
                    .await;
                for result in asset_results {
                    if let Some(issue) = result? {
                        issues.push(issue);
                    }
                }
            }
        }
    }

    Ok(report(issues))
}

/// Diagnose one file: absent means missing; a non-empty expected checksum is
/// verified by streaming SHA-1 and a mismatch means corrupted.
pub async fn diagnose_file(
    file: PathBuf,
    expected_checksum: &str,
    role: IssueRole,
    hint: &str,
    cancel: &CancelToken,
) -> Result<Option<Issue>> {
    if cancel.is_cancelled() {
        return Ok(None);
    }
    if tokio::fs::metadata(&file).await.is_err() {
        return Ok(Some(Issue {
            kind: IssueKind::Missing,
            role,
            file,
            expected_checksum: expected_checksum.to_string(),
            received_checksum: String::new(),
            hint: hint.to_string(),
        }));
    }
    if expected_checksum.is_empty() {
        return Ok(None);
    }
    if cancel.is_cancelled() {
        return Ok(None);
    }
    let received_checksum = calculate_sha1_from_file(&file).await?;
    if received_checksum != expected_checksum {
        return Ok(Some(Issue {
            kind: IssueKind::Corrupted,
            role,
            file,
            expected_checksum: expected_checksum.to_string(),
            received_checksum,
            hint: hint.to_string(),
        }));
    }
    Ok(None)
}

async fn diagnose_library(
    library: &ResolvedLibrary,
    minecraft: &MinecraftLocation,
    strict: bool,
    cancel: &CancelToken,
) -> Result<Option<Issue>> {
    let file = minecraft.get_library_by_path(&library.download.path);
    let role = IssueRole::Library {
        name: library.info.name.clone(),
    };
    let hint = "the library file is broken, redownload it from its maven repository";
    if !strict {
        return diagnose_file(file, &library.download.sha1, role, hint, cancel).await;
    }
    if cancel.is_cancelled() {
        return Ok(None);
    }
    let metadata = match tokio::fs::metadata(&file).await {
        Ok(metadata) => metadata,
        Err(_) => {
            return Ok(Some(Issue {
                kind: IssueKind::Missing,
                role,
                file,
                expected_checksum: library.download.sha1.clone(),
                received_checksum: String::new(),
                hint: hint.to_string(),
            }));
        }
    };
    if library.download.size < 0 || metadata.len() as i64 == library.download.size {
        return Ok(None);
    }
    diagnose_file(file, &library.download.sha1, role, hint, cancel).await
}

async fn diagnose_asset(
    name: String,
    object: AssetIndexObjectInfo,
    minecraft: &MinecraftLocation,
    strict: bool,
    cancel: &CancelToken,
) -> Result<Option<Issue>> {
    let file = minecraft.get_asset(&object.hash);
    let role = IssueRole::Asset { name };
    let hint = "the asset file is broken, redownload it from the resources server";
    if strict {
        return diagnose_file(file, &object.hash, role, hint, cancel).await;
    }
    if cancel.is_cancelled() {
        return Ok(None);
    }
    match tokio::fs::metadata(&file).await {
        Err(_) => Ok(Some(Issue {
            kind: IssueKind::Missing,
            role,
            file,
            expected_checksum: object.hash.clone(),
            received_checksum: String::new(),
            hint: hint.to_string(),
        })),
        Ok(metadata) if metadata.len() != object.size => {
            diagnose_file(file, &object.hash, role, hint, cancel).await
        }
        Ok(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::sha1::calculate_sha1_from_read;

    fn temp_minecraft() -> MinecraftLocation {
        let _ = env_logger::builder().is_test(true).try_init();
        let root = std::env::temp_dir().join(format!("lzl-diagnose-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).unwrap();
        MinecraftLocation::new(&root)
    }

    fn linux_platform() -> PlatformInfo {
        PlatformInfo {
            name: "linux".to_string(),
            version: "6.1.0".to_string(),
            arch: "x64".to_string(),
        }
    }

    fn sha1_of(content: &[u8]) -> String {
        let mut cursor = std::io::Cursor::new(content.to_vec());
        calculate_sha1_from_read(&mut cursor).unwrap()
    }

    fn write(path: &std::path::Path, content: &[u8]) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn write_client_version(minecraft: &MinecraftLocation, id: &str, client_sha1: &str) {
        write(
            &minecraft.get_version_json(id),
            format!(
                r#"{{
                    "id": "{id}",
                    "mainClass": "net.minecraft.client.main.Main",
                    "arguments": {{ "game": [], "jvm": [] }},
                    "downloads": {{
                        "client": {{ "sha1": "{client_sha1}", "size": 5, "url": "https://example.com/client.jar" }}
                    }},
                    "libraries": []
                }}"#
            )
            .as_bytes(),
        );
    }

    #[tokio::test]
    async fn intact_jar_produces_no_issue() {
        let minecraft = temp_minecraft();
        let jar_content = b"not actually a jar";
        write_client_version(&minecraft, "t", &sha1_of(jar_content));
        write(&minecraft.get_version_jar("t", None), jar_content);
        let report = diagnose("t", &minecraft, &linux_platform(), &DiagnoseOptions::default())
            .await
            .unwrap();
        assert!(report.issues.is_empty());
        assert_eq!(report.version, "t");
    }

    #[tokio::test]
    async fn corrupt_jar_is_reported_once() {
        let minecraft = temp_minecraft();
        write_client_version(&minecraft, "t", &sha1_of(b"expected content"));
        write(&minecraft.get_version_jar("t", None), b"tampered content");
        let report = diagnose("t", &minecraft, &linux_platform(), &DiagnoseOptions::default())
            .await
            .unwrap();
        assert_eq!(report.issues.len(), 1);
        let issue = &report.issues[0];
        assert_eq!(issue.kind, IssueKind::Corrupted);
        assert_eq!(
            issue.role,
            IssueRole::MinecraftJar {
                version: "t".to_string()
            }
        );
        assert_eq!(issue.expected_checksum, sha1_of(b"expected content"));
        assert_eq!(issue.received_checksum, sha1_of(b"tampered content"));
    }

    #[tokio::test]
    async fn missing_jar_is_reported_as_missing() {
        let minecraft = temp_minecraft();
        write_client_version(&minecraft, "t", &sha1_of(b"whatever"));
        let report = diagnose("t", &minecraft, &linux_platform(), &DiagnoseOptions::default())
            .await
            .unwrap();
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::Missing);
        assert_eq!(report.issues[0].file, minecraft.get_version_jar("t", None));
    }

    #[tokio::test]
    async fn unreadable_version_json_short_circuits() {
        let minecraft = temp_minecraft();
        let report = diagnose(
            "absent",
            &minecraft,
            &linux_platform(),
            &DiagnoseOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::Missing);
        assert_eq!(
            report.issues[0].role,
            IssueRole::VersionJson {
                version: "absent".to_string()
            }
        );

        write(&minecraft.get_version_json("bad"), b"{ nope");
        let report = diagnose(
            "bad",
            &minecraft,
            &linux_platform(),
            &DiagnoseOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::Corrupted);
    }

    #[tokio::test]
    async fn missing_library_is_reported() {
        let minecraft = temp_minecraft();
        let jar_content = b"jar";
        write(
            &minecraft.get_version_json("t"),
            format!(
                r#"{{
                    "id": "t",
                    "mainClass": "net.minecraft.client.main.Main",
                    "arguments": {{ "game": [], "jvm": [] }},
                    "downloads": {{
                        "client": {{ "sha1": "{}", "size": 3, "url": "https://example.com/client.jar" }}
                    }},
                    "libraries": [
                        {{
                            "name": "com.mojang:logging:1.1.1",
                            "downloads": {{
                                "artifact": {{
                                    "path": "com/mojang/logging/1.1.1/logging-1.1.1.jar",
                                    "sha1": "832b8e6674a9b325a5175a3a6267dfaf34c85139",
                                    "size": 15343,
                                    "url": "https://libraries.minecraft.net/com/mojang/logging/1.1.1/logging-1.1.1.jar"
                                }}
                            }}
                        }}
                    ]
                }}"#,
                sha1_of(jar_content)
            )
            .as_bytes(),
        );
        write(&minecraft.get_version_jar("t", None), jar_content);
        let report = diagnose("t", &minecraft, &linux_platform(), &DiagnoseOptions::default())
            .await
            .unwrap();
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::Missing);
        assert_eq!(
            report.issues[0].role,
            IssueRole::Library {
                name: "com.mojang:logging:1.1.1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn assets_are_checked_through_the_index() {
        let minecraft = temp_minecraft();
        let jar_content = b"jar";
        let good_asset = b"asset payload";
        let good_hash = sha1_of(good_asset);
        let index_content = format!(
            r#"{{ "objects": {{ "minecraft/sounds/ambient.ogg": {{ "hash": "{good_hash}", "size": {} }} }} }}"#,
            good_asset.len()
        );
        let index_hash = sha1_of(index_content.as_bytes());
        write(
            &minecraft.get_version_json("t"),
            format!(
                r#"{{
                    "id": "t",
                    "mainClass": "net.minecraft.client.main.Main",
                    "arguments": {{ "game": [], "jvm": [] }},
                    "assets": "5",
                    "assetIndex": {{ "id": "5", "sha1": "{index_hash}", "size": 1, "totalSize": 1, "url": "" }},
                    "downloads": {{
                        "client": {{ "sha1": "{}", "size": 3, "url": "https://example.com/client.jar" }}
                    }},
                    "libraries": []
                }}"#,
                sha1_of(jar_content)
            )
            .as_bytes(),
        );
        write(&minecraft.get_version_jar("t", None), jar_content);
        write(&minecraft.get_assets_index("5"), index_content.as_bytes());
        write(&minecraft.get_asset(&good_hash), good_asset);

        let report = diagnose("t", &minecraft, &linux_platform(), &DiagnoseOptions::default())
            .await
            .unwrap();
        assert!(report.issues.is_empty(), "{:?}", report.issues);

        // same size, different content: only strict mode hashes it
        write(&minecraft.get_asset(&good_hash), b"asset_payload");
        let report = diagnose("t", &minecraft, &linux_platform(), &DiagnoseOptions::default())
            .await
            .unwrap();
        assert!(report.issues.is_empty());
        let strict = DiagnoseOptions {
            strict: true,
            cancel: CancelToken::new(),
        };
        let report = diagnose("t", &minecraft, &linux_platform(), &strict)
            .await
            .unwrap();
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::Corrupted);
        assert_eq!(
            report.issues[0].role,
            IssueRole::Asset {
                name: "minecraft/sounds/ambient.ogg".to_string()
            }
        );

        // a removed asset object is missing in both modes
        std::fs::remove_file(minecraft.get_asset(&good_hash)).unwrap();
        let report = diagnose("t", &minecraft, &linux_platform(), &DiagnoseOptions::default())
            .await
            .unwrap();
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::Missing);
    }

    #[tokio::test]
    async fn cancellation_yields_a_partial_report() {
        let minecraft = temp_minecraft();
        write_client_version(&minecraft, "t", &sha1_of(b"content"));
        let options = DiagnoseOptions::default();
        options.cancel.cancel();
        let report = diagnose("t", &minecraft, &linux_platform(), &options)
            .await
            .unwrap();
        assert!(report.issues.is_empty());
    }
}
