/// Tests for the pieces of the update sequence that need no network:
/// version comparison, the version marker, working directory layout and
/// configuration loading.
#[cfg(test)]
mod tests {
    use std::path::Path;

    use bootstrap_launcher::workdir::{resolve_working_dir_in, working_directory_for};
    use bootstrap_launcher::{
        check_update, ErrorKind, LaunchError, LauncherConfig, OsFamily, UpdateDecision,
        VersionMarker,
    };

    #[test]
    fn test_update_required_only_when_current_is_older() {
        assert_eq!(check_update("3", "10"), UpdateDecision::Required);
        assert_eq!(check_update("10", "3"), UpdateDecision::UpToDate);
        assert_eq!(check_update("5", "5"), UpdateDecision::UpToDate);
        assert_eq!(check_update("-1", "0"), UpdateDecision::Required);
    }

    #[test]
    fn test_update_decision_ignores_surrounding_whitespace() {
        assert_eq!(check_update(" 4\n", "5"), UpdateDecision::Required);
    }

    #[test]
    fn test_unparseable_versions_are_indeterminate() {
        assert_eq!(check_update("abc", "5"), UpdateDecision::Indeterminate);
        assert_eq!(check_update("5", "v6"), UpdateDecision::Indeterminate);
        assert_eq!(check_update("", ""), UpdateDecision::Indeterminate);
    }

    #[test]
    fn test_os_classification() {
        assert_eq!(OsFamily::classify("Windows 10"), OsFamily::Windows);
        assert_eq!(OsFamily::classify("windows"), OsFamily::Windows);
        assert_eq!(OsFamily::classify("Mac OS X"), OsFamily::MacOs);
        assert_eq!(OsFamily::classify("macos"), OsFamily::MacOs);
        assert_eq!(OsFamily::classify("SunOS"), OsFamily::Solaris);
        assert_eq!(OsFamily::classify("solaris"), OsFamily::Solaris);
        assert_eq!(OsFamily::classify("Linux"), OsFamily::Linux);
        assert_eq!(OsFamily::classify("unix"), OsFamily::Linux);
        assert_eq!(OsFamily::classify("freebsd"), OsFamily::Unknown);
    }

    #[test]
    fn test_working_directory_layout_per_os() {
        let home = Path::new("/home/steve");
        let app_data = Path::new("/appdata");

        assert_eq!(
            working_directory_for(OsFamily::Linux, home, Some(app_data), "Spoutcraft"),
            home.join(".Spoutcraft")
        );
        assert_eq!(
            working_directory_for(OsFamily::Solaris, home, None, "Spoutcraft"),
            home.join(".Spoutcraft")
        );
        assert_eq!(
            working_directory_for(OsFamily::Windows, home, Some(app_data), "Spoutcraft"),
            app_data.join(".Spoutcraft")
        );
        assert_eq!(
            working_directory_for(OsFamily::Windows, home, None, "Spoutcraft"),
            home.join(".Spoutcraft")
        );
        assert_eq!(
            working_directory_for(OsFamily::MacOs, home, Some(app_data), "Spoutcraft"),
            home.join("Library").join("Application Support").join("Spoutcraft")
        );
        assert_eq!(
            working_directory_for(OsFamily::Unknown, home, None, "Spoutcraft"),
            home.join("Spoutcraft")
        );
    }

    #[test]
    fn test_resolve_working_dir_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path().join("home");
        let app_data = tmp.path().join("appdata");

        for os in [
            OsFamily::Linux,
            OsFamily::Solaris,
            OsFamily::Windows,
            OsFamily::MacOs,
            OsFamily::Unknown,
        ] {
            let dir = resolve_working_dir_in(os, &home, Some(&app_data), "App").unwrap();
            assert_eq!(dir, working_directory_for(os, &home, Some(&app_data), "App"));
            assert!(dir.is_dir(), "{os:?}: {} was not created", dir.display());
        }
    }

    #[test]
    fn test_resolve_working_dir_fails_under_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path().join("home");
        std::fs::write(&home, "not a directory").unwrap();

        let err = resolve_working_dir_in(OsFamily::Unknown, &home, None, "App").unwrap_err();
        assert!(matches!(err, LaunchError::WorkingDirectory { .. }));
        assert_eq!(err.kind(), ErrorKind::Filesystem);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_version_marker_write_then_read() {
        let tmp = tempfile::tempdir().unwrap();
        let marker = VersionMarker::new(tmp.path().join("launcherVersion"));

        assert!(!marker.exists());
        assert_eq!(marker.read(), None);

        marker.write("7").expect("write marker");
        assert!(marker.exists());
        assert_eq!(marker.read().as_deref(), Some("7"));
        assert_eq!(std::fs::read_to_string(marker.path()).unwrap(), "7");

        marker.write("12").expect("overwrite marker");
        assert_eq!(marker.read().as_deref(), Some("12"));
    }

    #[test]
    fn test_version_marker_reads_first_line_only() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("launcherVersion");
        std::fs::write(&path, "42\nleftover\n").unwrap();

        assert_eq!(VersionMarker::new(&path).read().as_deref(), Some("42"));
    }

    #[test]
    fn test_empty_version_marker_reads_as_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("launcherVersion");
        std::fs::write(&path, "").unwrap();

        let marker = VersionMarker::new(&path);
        assert!(marker.exists());
        assert_eq!(marker.read(), None);
    }

    #[test]
    fn test_config_accepts_documented_option_names() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("launcher.json");
        std::fs::write(
            &path,
            r#"{
                "versionCheckURL": "https://example.com/build",
                "artifactURL": "https://example.com/artifact",
                "entryPointIdentifier": "play",
                "retry_count": 3
            }"#,
        )
        .unwrap();

        let config = LauncherConfig::from_file(&path).expect("load config");
        assert_eq!(config.version_check_url, "https://example.com/build");
        assert_eq!(config.artifact_url, "https://example.com/artifact");
        assert_eq!(config.entry_point.as_deref(), Some("play"));
        assert_eq!(config.retry_count, 3);
        assert_eq!(config.marker_name, "launcherVersion");
        assert_eq!(config.app_name, "Spoutcraft");
        config.validate().expect("valid config");
    }

    #[test]
    fn test_config_parse_error_is_a_configuration_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("launcher.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = LauncherConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, LaunchError::ConfigParse { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_invalid_url_fails_validation() {
        let config = LauncherConfig {
            artifact_url: "not a url".to_owned(),
            proxy: None,
            ..LauncherConfig::default()
        };

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            LaunchError::InvalidUrl {
                field: "artifact URL",
                ..
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_exit_codes_differ_by_kind() {
        let codes = [
            ErrorKind::Configuration.exit_code(),
            ErrorKind::Filesystem.exit_code(),
            ErrorKind::Network.exit_code(),
            ErrorKind::Launch.exit_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            assert_ne!(*a, 0);
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(LaunchError::LatestVersionUnavailable.exit_code(), 4);
    }
}
