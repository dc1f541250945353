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

use serde::Serialize;

use crate::error::{Error, Result};

/// The parsed form of a maven coordinate like
/// `net.minecraftforge:forge:1.19-41.0.0:universal@zip`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LibraryInfo {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub is_snapshot: bool,

    /// The file extension. Default is `jar`. Some files in forge are `zip`.
    pub r#type: String,

    /// The classifier. Normally, this is empty. For forge, it can be like
    /// `universal`, `installer`; for natives it is `natives-{os}`.
    pub classifier: String,

    /// The maven path, like `net/minecraftforge/forge/1.19-41.0.0/forge-1.19-41.0.0-universal.zip`.
    pub path: String,

    /// The original maven name of this library
    pub name: String,
}

impl LibraryInfo {
    /// Get the base info of the library from its maven name.
    ///
    /// * `name` - The maven coordinate, `group:artifact:version[:classifier][@type]`
    pub fn from_name(name: &str) -> Result<Self> {
        let (body, r#type) = match name.split_once('@') {
            Some((body, extension)) => (body, extension),
            None => (name, "jar"),
        };
        let sections = body.split(':').collect::<Vec<&str>>();
        if sections.len() < 3 || sections.len() > 4 {
            return Err(Error::InvalidLibraryName(name.to_string()));
        }
        let group_id = sections[0].to_string();
        let artifact_id = sections[1].to_string();
        let version = sections[2].to_string();
        let classifier = sections.get(3).unwrap_or(&"").to_string();
        if group_id.is_empty() || artifact_id.is_empty() || version.is_empty() {
            return Err(Error::InvalidLibraryName(name.to_string()));
        }
        Ok(Self::assemble(
            group_id,
            artifact_id,
            version,
            classifier,
            r#type.to_string(),
        ))
    }

    /// Get the base info of the library from its maven path.
    ///
    /// The last three path segments are `{artifact}/{version}/{file}`; every
    /// segment before them forms the group. The classifier is whatever is
    /// left of the file name after stripping the `{artifact}-{version}`
    /// prefix (or the bare `{version}` prefix for snapshot style files) and
    /// the extension.
    pub fn from_path(path: &str) -> Result<Self> {
        let segments = path.split('/').collect::<Vec<&str>>();
        if segments.len() < 4 {
            return Err(Error::InvalidLibraryName(path.to_string()));
        }
        let file = segments[segments.len() - 1];
        let version = segments[segments.len() - 2].to_string();
        let artifact_id = segments[segments.len() - 3].to_string();
        let group_id = segments[..segments.len() - 3].join(".");
        let (base, r#type) = match file.rsplit_once('.') {
            Some((base, extension)) => (base, extension.to_string()),
            None => (file, "jar".to_string()),
        };
        let remainder = if let Some(rest) = base.strip_prefix(&format!("{artifact_id}-{version}")) {
            rest
        } else if let Some(rest) = base.strip_prefix(version.as_str()) {
            rest
        } else {
            return Err(Error::InvalidLibraryName(path.to_string()));
        };
        let classifier = remainder.trim_start_matches('-').to_string();
        Ok(Self::assemble(
            group_id,
            artifact_id,
            version,
            classifier,
            r#type,
        ))
    }

    /// Rebuild this info with another classifier, recomputing name and path.
    pub fn with_classifier(&self, classifier: &str) -> Self {
        Self::assemble(
            self.group_id.clone(),
            self.artifact_id.clone(),
            self.version.clone(),
            classifier.to_string(),
            self.r#type.clone(),
        )
    }

    fn assemble(
        group_id: String,
        artifact_id: String,
        version: String,
        classifier: String,
        r#type: String,
    ) -> Self {
        let group_path = group_id.replace('.', "/");
        let file_base = format!("{artifact_id}-{version}");
        let path = if classifier.is_empty() {
            format!("{group_path}/{artifact_id}/{version}/{file_base}.{}", r#type)
        } else {
            format!(
                "{group_path}/{artifact_id}/{version}/{file_base}-{classifier}.{}",
                r#type
            )
        };
        let mut name = format!("{group_id}:{artifact_id}:{version}");
        if !classifier.is_empty() {
            name.push(':');
            name.push_str(&classifier);
        }
        if r#type != "jar" {
            name.push('@');
            name.push_str(&r#type);
        }
        Self {
            is_snapshot: version.ends_with("-SNAPSHOT"),
            group_id,
            artifact_id,
            version,
            r#type,
            classifier,
            path,
            name,
        }
    }
}
