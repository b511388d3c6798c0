//! Calibre-Web `settings` table in `app.db`.

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

use super::library_dir_str;
use crate::error::{LocatorError, Result};

pub struct SettingsDb {
    path: PathBuf,
    conn: Connection,
}

impl SettingsDb {
    /// Open an existing settings database.
    ///
    /// The create flag is left off so a missing `app.db` is reported
    /// instead of silently replaced by an empty file.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(LocatorError::SettingsDbMissing(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| LocatorError::SettingsDb {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }

    /// Set `config_calibre_dir` on every row and commit.
    ///
    /// Returns the number of rows updated.
    pub fn set_library_dir(&mut self, library_dir: &Path) -> Result<usize> {
        let library_dir = library_dir_str(library_dir)?;
        let path = &self.path;
        let sql_error = |source| LocatorError::SettingsDb {
            path: path.clone(),
            source,
        };

        let tx = self.conn.transaction().map_err(sql_error)?;
        let updated = tx
            .execute(
                "UPDATE settings SET config_calibre_dir = ?1",
                rusqlite::params![library_dir],
            )
            .map_err(sql_error)?;
        tx.commit().map_err(sql_error)?;

        Ok(updated)
    }

    #[cfg(test)]
    fn library_dirs(&self) -> Result<Vec<Option<String>>> {
        let sql_error = |source| LocatorError::SettingsDb {
            path: self.path.clone(),
            source,
        };

        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT config_calibre_dir FROM settings")
            .map_err(sql_error)?;
        let dirs = stmt
            .query_map([], |row| row.get::<_, Option<String>>(0))
            .map_err(sql_error)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(sql_error)?;
        Ok(dirs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_app_db(path: &Path, rows: &[Option<&str>]) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE settings (
                id INTEGER PRIMARY KEY,
                mail_server TEXT,
                config_calibre_dir TEXT
            );",
        )
        .unwrap();
        for row in rows {
            conn.execute(
                "INSERT INTO settings (mail_server, config_calibre_dir) VALUES ('mail.example.org', ?1)",
                rusqlite::params![row],
            )
            .unwrap();
        }
    }

    #[test]
    fn test_single_row_is_updated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.db");
        create_app_db(&path, &[Some("/somewhere/else")]);

        let mut db = SettingsDb::open(&path).unwrap();
        assert_eq!(db.set_library_dir(Path::new("/calibre-library/Books")).unwrap(), 1);
        drop(db);

        let conn = Connection::open(&path).unwrap();
        let (dir_value, mail): (String, String) = conn
            .query_row(
                "SELECT config_calibre_dir, mail_server FROM settings",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(dir_value, "/calibre-library/Books");
        assert_eq!(mail, "mail.example.org");
    }

    #[test]
    fn test_every_row_is_updated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.db");
        create_app_db(&path, &[Some("/a"), None, Some("/b")]);

        let mut db = SettingsDb::open(&path).unwrap();
        assert_eq!(db.set_library_dir(Path::new("/books")).unwrap(), 3);
        assert_eq!(db.library_dirs().unwrap(), vec![Some("/books".to_string())]);
    }

    #[test]
    fn test_empty_table_updates_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.db");
        create_app_db(&path, &[]);

        let mut db = SettingsDb::open(&path).unwrap();
        assert_eq!(db.set_library_dir(Path::new("/books")).unwrap(), 0);
    }

    #[test]
    fn test_missing_database_is_not_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.db");

        let err = SettingsDb::open(&path).err().unwrap();
        assert!(matches!(err, LocatorError::SettingsDbMissing(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_table_is_an_sql_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE other (id INTEGER);")
            .unwrap();

        let mut db = SettingsDb::open(&path).unwrap();
        let err = db.set_library_dir(Path::new("/books")).unwrap_err();
        assert!(matches!(err, LocatorError::SettingsDb { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_directory_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("app.db");
        create_app_db(&path, &[Some("/old")]);

        let mut db = SettingsDb::open(&path).unwrap();
        let err = db
            .set_library_dir(Path::new(OsStr::from_bytes(b"/calibre-library/\xffBooks")))
            .unwrap_err();

        assert!(matches!(err, LocatorError::NonUtf8Path(_)));
        assert_eq!(db.library_dirs().unwrap(), vec![Some("/old".to_string())]);
    }
}
