//! 技能加载器
//!
//! 按约定路径 `<skills_dir>/<name>/SKILL.md` 读取技能说明全文，原样返回，不做解析。

use std::path::{Path, PathBuf};

use crate::core::RouterError;

/// 技能说明文件名
pub const SKILL_FILE: &str = "SKILL.md";

/// 技能加载器
#[derive(Debug, Clone)]
pub struct SkillLoader {
    skills_dir: PathBuf,
}

impl SkillLoader {
    /// 创建新的加载器
    pub fn new(skills_dir: impl AsRef<Path>) -> Self {
        Self {
            skills_dir: skills_dir.as_ref().to_path_buf(),
        }
    }

    /// 技能说明文件路径
    pub fn skill_path(&self, name: &str) -> PathBuf {
        self.skills_dir.join(name).join(SKILL_FILE)
    }

    /// 读取技能说明全文；空文件视为加载失败
    pub fn load(&self, name: &str) -> Result<String, RouterError> {
        let path = self.skill_path(name);
        if !path.is_file() {
            return Err(RouterError::SkillNotFound(path));
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|source| RouterError::SkillRead { path: path.clone(), source })?;
        if content.is_empty() {
            return Err(RouterError::SkillEmpty(path));
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_skill(root: &Path, name: &str, content: &str) {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(SKILL_FILE), content).unwrap();
    }

    #[test]
    fn test_load_returns_content_verbatim() {
        let dir = TempDir::new().unwrap();
        let content = "# Scraper\n\n  keep   spacing\n";
        write_skill(dir.path(), "scraper", content);

        let loader = SkillLoader::new(dir.path());
        assert_eq!(loader.load("scraper").unwrap(), content);
    }

    #[test]
    fn test_each_name_resolves_its_own_file() {
        let dir = TempDir::new().unwrap();
        write_skill(dir.path(), "scraper", "scraper instructions");
        write_skill(dir.path(), "ad-writer", "ad-writer instructions");

        let loader = SkillLoader::new(dir.path());
        assert_eq!(loader.load("ad-writer").unwrap(), "ad-writer instructions");
        assert_eq!(loader.load("scraper").unwrap(), "scraper instructions");
    }

    #[test]
    fn test_missing_skill_is_not_found() {
        let dir = TempDir::new().unwrap();
        let loader = SkillLoader::new(dir.path());
        let err = loader.load("ghost").unwrap_err();
        assert!(matches!(err, RouterError::SkillNotFound(ref p) if p.ends_with("ghost/SKILL.md")));
    }

    #[test]
    fn test_empty_skill_is_rejected() {
        let dir = TempDir::new().unwrap();
        write_skill(dir.path(), "blank", "");
        write_skill(dir.path(), "spaces", "  \n");

        let loader = SkillLoader::new(dir.path());
        let err = loader.load("blank").unwrap_err();
        assert!(matches!(err, RouterError::SkillEmpty(ref p) if p.ends_with("blank/SKILL.md")));
        assert!(!err.is_not_found());
        // 只有空白的文件仍按原文返回
        assert_eq!(loader.load("spaces").unwrap(), "  \n");
    }
}
