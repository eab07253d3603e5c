use clap::Parser;
use specsite::{output, site};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "specsite")]
#[command(about = "Static website builder for Markdown specifications")]
#[command(long_about = "\
Static website builder for Markdown specifications

Renders every Markdown file below spec/ (published under /std/) and
website/pages/ (published under /) through website/templates/page.html.tpl,
links the pages into a navigation hierarchy, compiles ```tikz diagram blocks
to SVG with pdflatex and pdf2svg, and mirrors website/static/ to /static/.

Input layout:

  repo/
  ├── spec/core/1.0.md             # → /std/core/1.0/index.html
  └── website/
      ├── config.toml              # Optional, overrides the layout and tools
      ├── pages/index.md           # → /index.html
      ├── static/                  # → /static/
      └── templates/page.html.tpl

Page conventions:
  <!-- draft -->                              first line: mark as draft
  <!-- {\"title\": ..., \"description\": ...} -->  first line: page metadata
  # Title - Description                       first heading: page metadata
  *Rationale:* ...                            paragraph gets class=\"rationale\"")]
#[command(version)]
struct Cli {
    /// Repository containing spec/ and website/
    input: PathBuf,

    /// Directory to write the website to
    output: PathBuf,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            eprintln!(
                "{}",
                output::format_usage_error("specsite", &err.kind().to_string())
            );
            return ExitCode::FAILURE;
        }
    };

    println!(
        "==> Building {} \u{2192} {}",
        cli.input.display(),
        cli.output.display()
    );
    match site::build_site(&cli.input, &cli.output) {
        Ok(summary) => {
            output::print_build_output(&summary);
            println!("==> Build complete: {}", cli.output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
