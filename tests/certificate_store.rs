//! Certificate persistence tests
//!
//! Storage layout, reloading, listing and printing of stored certificates.

use std::fs;

use ceremony::certificate::{
    find_latest, load_certificate, CertificateQuestion, CertificateResponse,
};
use ceremony::{
    Certificate, CertificateRenderer, CertificateStore, Config, MarkdownRenderer, YamlStore,
};
use chrono::{Local, TimeZone};
use tempfile::TempDir;
use uuid::Uuid;

fn certificate(applicant: &str, year: i32, month: u32) -> Certificate {
    Certificate {
        id: Uuid::new_v4(),
        date: Local.with_ymd_and_hms(year, month, 15, 12, 0, 0).unwrap(),
        applicant: applicant.to_string(),
        object_name: "Linzer Torte".to_string(),
        reviewers: vec!["Grace".to_string(), "Linus".to_string()],
        questions: vec![CertificateQuestion {
            question: "Taste".to_string(),
            responses: vec![
                CertificateResponse::new("Grace", 4, "nutty"),
                CertificateResponse::new("Linus", 2, ""),
            ],
        }],
    }
}

mod persistence {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip_under_year_month() {
        let dir = TempDir::new().unwrap();
        let store = YamlStore::new(dir.path());
        let original = certificate("Ada", 2024, 7);

        let path = store.persist(&original, None).unwrap();
        assert_eq!(
            path,
            dir.path().join("2024").join("07").join(format!("{}.yaml", original.id))
        );
        assert_eq!(store.load(&path).unwrap(), original);
    }

    #[test]
    fn test_id_taken_from_filename() {
        let dir = TempDir::new().unwrap();
        let id = Uuid::new_v4();
        let path = dir.path().join(format!("{id}.yaml"));
        fs::write(
            &path,
            "date: 2024-05-01T10:00:00+02:00\napplicant: Ada\nobject_name: Tart\n",
        )
        .unwrap();

        let loaded = load_certificate(&path).unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.applicant, "Ada");
        assert!(loaded.questions.is_empty());
    }

    #[test]
    fn test_missing_date_loads_as_epoch() {
        let dir = TempDir::new().unwrap();
        let id = Uuid::new_v4();
        let path = dir.path().join(format!("{id}.yaml"));
        fs::write(&path, "applicant: Ada\nobject_name: Tart\n").unwrap();

        let loaded = load_certificate(&path).unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.date, Certificate::default().date);

        let config = Config::builtin().unwrap();
        let output = MarkdownRenderer::new()
            .unwrap()
            .render(&loaded, &config.schema.skill_levels, None)
            .unwrap();
        assert!(output.contains("**Ada** presented **Tart**"));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "questions: {").unwrap();
        assert!(load_certificate(&path).is_err());
        assert!(load_certificate(&dir.path().join("absent.yaml")).is_err());
    }
}

mod listing {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_latest_first() {
        let dir = TempDir::new().unwrap();
        let store = YamlStore::new(dir.path());
        for (applicant, year, month) in [("Old", 2022, 1), ("New", 2024, 9), ("Mid", 2023, 5)] {
            store.persist(&certificate(applicant, year, month), None).unwrap();
        }

        let entries = find_latest(dir.path(), 2);
        let applicants: Vec<&str> = entries.iter().map(|e| e.applicant.as_str()).collect();
        assert_eq!(applicants, vec!["New", "Mid"]);
        assert_eq!(entries[0].object_name, "Linzer Torte");
    }
}

mod printing {
    use super::*;

    #[test]
    fn test_stored_certificate_renders_with_rank() {
        let dir = TempDir::new().unwrap();
        let store = YamlStore::new(dir.path());
        let path = store.persist(&certificate("Ada", 2024, 7), None).unwrap();
        let loaded = store.load(&path).unwrap();

        let config = Config::builtin().unwrap();
        let output = MarkdownRenderer::new()
            .unwrap()
            .render(&loaded, &config.schema.skill_levels, None)
            .unwrap();

        assert!(output.contains("**Ada** presented **Linzer Torte**"));
        assert!(output.contains("15.07.2024"));
        assert!(output.contains("| Taste | 2.00 | 4.00 | 3.00 |"));
        assert!(output.contains("Awarded rank: **Cake Consultant 🥸**"));
        assert!(!output.contains("!["));
    }
}
