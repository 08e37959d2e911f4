//! Implements `ceremony print`: render a stored certificate as Markdown.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use console::style;
use tracing::{debug, warn};

use crate::certificate::{
    find_by_id, find_latest, load_certificate, CertificateRenderer, MarkdownRenderer,
};
use crate::config::{AppPaths, Config};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Options for the print command
#[derive(Debug, Clone)]
pub struct PrintOptions {
    pub paths: AppPaths,
    /// Certificate id; the latest certificate when absent
    pub id: Option<String>,
    /// Write to stdout instead of `<id>.md`
    pub stdout: bool,
    /// Open the written file with the platform opener
    pub open: bool,
}

/// Execute the print command
pub fn execute_print(options: PrintOptions) -> Result<()> {
    let config = Config::load_or_create(&options.paths)?;
    let root = config.certificates_root(&options.paths)?;

    let path = match &options.id {
        Some(id) => find_by_id(&root, id)
            .ok_or_else(|| anyhow!("no certificate with id {id} in {}", root.display()))?,
        None => find_latest(&root, 1)
            .into_iter()
            .next()
            .map(|entry| entry.path)
            .ok_or_else(|| anyhow!("no certificates in {}", root.display()))?,
    };

    let output = render_certificate(&path, &options.paths, &config)?;

    if options.stdout {
        print!("{output}");
        return Ok(());
    }

    let target = path.with_extension("md");
    std::fs::write(&target, output).with_context(|| format!("writing {}", target.display()))?;
    println!("{} Written {}", style("✓").green(), target.display());

    if options.open {
        open_file(&target);
    }
    Ok(())
}

/// Markdown for the certificate stored at `path`
pub fn render_certificate(path: &Path, paths: &AppPaths, config: &Config) -> Result<String> {
    let certificate = load_certificate(path)?;
    let renderer = MarkdownRenderer::from_override(&paths.certificate_template())?;
    let image = companion_image(path);
    let image_name = image
        .as_deref()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str());

    Ok(renderer.render(&certificate, &config.schema.skill_levels, image_name)?)
}

/// `<stem>.<ext>` picture stored next to a certificate
fn companion_image(path: &Path) -> Option<PathBuf> {
    IMAGE_EXTENSIONS
        .iter()
        .flat_map(|ext| [ext.to_string(), ext.to_uppercase()])
        .map(|ext| path.with_extension(ext))
        .find(|candidate| candidate.is_file())
}

/// Platform opener for `path`
fn opener_command(path: &Path) -> Command {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else {
        Command::new("xdg-open")
    };
    command.arg(path);
    command
}

/// Start the opener without waiting for it
fn open_file(path: &Path) {
    match opener_command(path).spawn() {
        Ok(child) => debug!(path = %path.display(), pid = child.id(), "opener started"),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "no opener available");
            eprintln!("{} Could not open {}", style("⚠").yellow(), path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::{save_certificate, Certificate, CertificateQuestion, CertificateResponse};
    use tempfile::TempDir;
    use uuid::Uuid;

    #[test]
    fn test_renders_with_companion_image() {
        let dir = TempDir::new().unwrap();
        let paths = AppPaths::new(dir.path());
        let config = Config::builtin().unwrap();

        let certificate = Certificate {
            id: Uuid::new_v4(),
            applicant: "Ada".into(),
            object_name: "Tart".into(),
            reviewers: vec!["Grace".into()],
            questions: vec![CertificateQuestion {
                question: "Taste".into(),
                responses: vec![CertificateResponse::new("Grace", 5, "")],
            }],
            ..Certificate::default()
        };
        let path = dir.path().join(format!("{}.yaml", certificate.id));
        save_certificate(&path, &certificate).unwrap();
        std::fs::write(path.with_extension("png"), b"png").unwrap();

        let output = render_certificate(&path, &paths, &config).unwrap();
        assert!(output.contains("**Ada** presented **Tart**"));
        assert!(output.contains(&format!("![Tart]({}.png)", certificate.id)));
        assert!(output.contains("Principal Cake Architect"));
    }

    #[test]
    fn test_opener_targets_file() {
        let path = Path::new("/tmp/certificate.md");
        let command = opener_command(path);
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args.last().copied(), Some(path.as_os_str()));
        if cfg!(target_os = "linux") {
            assert_eq!(command.get_program(), "xdg-open");
        }
    }
}
