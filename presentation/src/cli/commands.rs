//! CLI command definitions

use clap::Parser;
use review_application::ReviewParams;
use review_domain::{AgentRole, Model, OutputFormat, RepoId, RoleProfile};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while applying command-line overrides
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    #[error("--role: {0}")]
    UnknownRole(String),

    #[error("--role: '{0}' is the arbiter; it runs unless --no-arbiter is given")]
    ArbiterAsSpecialist(String),

    #[error("{0} cannot be empty")]
    EmptyModelName(&'static str),
}

/// CLI arguments for pr-quorum
#[derive(Parser, Debug)]
#[command(name = "pr-quorum")]
#[command(author, version, about = "Multi-agent pull request review with a quorum verdict")]
#[command(long_about = r#"
pr-quorum reviews a pull request with a panel of specialist agents and posts
one consolidated review.

The process has three phases:
1. Specialists: Product Owner, Senior, Security, DevOps and QA agents review the
   diff in parallel
2. Arbiter: a Tech Lead reconciles the specialists
3. Synthesis: critical findings block, then the Tech Lead decides, then the
   specialist majority; findings become inline comments where possible

Configuration files are loaded from (in priority order):
1. PR_QUORUM_* environment variables
2. --config <path>     Explicit config file
3. ./pr-quorum.toml    Project-level config
4. ~/.config/pr-quorum/config.toml   Global config

Example:
  pr-quorum octo/app 42
  pr-quorum octo/app 42 --dry-run -o full
  pr-quorum octo/app 42 --diff-file change.diff -r security -r qa --dry-run
"#)]
pub struct Cli {
    /// Repository under review (`owner/name`)
    #[arg(env = "TARGET_REPO", required_unless_present = "show_config")]
    pub target_repo: Option<RepoId>,

    /// Pull request number
    #[arg(env = "PR_NUMBER", required_unless_present = "show_config")]
    pub pr_number: Option<u64>,

    /// Review a local unified diff (`-` for stdin) instead of fetching it
    #[arg(long, value_name = "PATH")]
    pub diff_file: Option<PathBuf>,

    /// Title shown for a local diff
    #[arg(long, value_name = "TITLE", requires = "diff_file")]
    pub title: Option<String>,

    /// Review without posting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Model for every agent without an override
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Model for the Tech Lead arbiter
    #[arg(long, value_name = "MODEL")]
    pub arbiter_model: Option<String>,

    /// Specialist roles to run (can be specified multiple times)
    #[arg(short, long, value_name = "ROLE")]
    pub role: Vec<String>,

    /// Skip the Tech Lead arbiter
    #[arg(long)]
    pub no_arbiter: bool,

    /// Never signal approval
    #[arg(long)]
    pub no_auto_approve: bool,

    /// Output format (full, summary, markdown, json)
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Write the review results as JSON to this file
    #[arg(long, value_name = "PATH")]
    pub results_file: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Apply command-line flags on top of the configured parameters
    pub fn apply_overrides(&self, mut params: ReviewParams) -> Result<ReviewParams, CliError> {
        if let Some(model) = &self.model {
            params = params.with_default_model(parse_model("--model", model)?);
        }
        if let Some(model) = &self.arbiter_model {
            params = params.with_arbiter_model(parse_model("--arbiter-model", model)?);
        }
        if !self.role.is_empty() {
            let specialists = self.selected_specialists(&params.specialists)?;
            params = params.with_specialists(specialists);
        }
        if self.no_arbiter {
            params = params.with_arbiter(None);
        }
        if self.no_auto_approve {
            params = params.with_auto_approve(false);
        }
        Ok(params)
    }

    /// Profiles for `--role`, keeping configured focus overrides
    fn selected_specialists(&self, configured: &[RoleProfile]) -> Result<Vec<RoleProfile>, CliError> {
        let mut roles = Vec::new();
        for name in &self.role {
            let role = name.parse::<AgentRole>().map_err(CliError::UnknownRole)?;
            if role.is_arbiter() {
                return Err(CliError::ArbiterAsSpecialist(name.clone()));
            }
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        roles.sort();

        Ok(roles
            .into_iter()
            .map(|role| {
                configured
                    .iter()
                    .find(|p| p.role == role)
                    .cloned()
                    .unwrap_or_else(|| RoleProfile::for_role(role))
            })
            .collect())
    }
}

fn parse_model(flag: &'static str, value: &str) -> Result<Model, CliError> {
    if value.trim().is_empty() {
        return Err(CliError::EmptyModelName(flag));
    }
    let Ok(model) = value.trim().parse::<Model>();
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pr-quorum").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_arguments() {
        let cli = parse(&["octo/app", "42", "--dry-run", "-o", "json"]);
        assert_eq!(cli.target_repo.unwrap().to_string(), "octo/app");
        assert_eq!(cli.pr_number, Some(42));
        assert!(cli.dry_run);
        assert_eq!(cli.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_show_config_needs_no_target() {
        let cli = parse(&["--show-config"]);
        assert!(cli.show_config);
        assert!(cli.target_repo.is_none());
    }

    #[test]
    fn test_invalid_repository_is_rejected() {
        let result = Cli::try_parse_from(["pr-quorum", "not a repo", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let cli = parse(&[
            "octo/app",
            "7",
            "-m",
            "gpt-4o",
            "--arbiter-model",
            "claude-opus-4.5",
            "-r",
            "qa",
            "-r",
            "security",
            "-r",
            "qa",
            "--no-arbiter",
            "--no-auto-approve",
        ]);
        let configured = ReviewParams::default().with_specialists(vec![
            RoleProfile::for_role(AgentRole::SecurityEngineer).with_focus(vec!["Secrets".to_string()]),
        ]);

        let params = cli.apply_overrides(configured).unwrap();

        let roles: Vec<AgentRole> = params.specialists.iter().map(|p| p.role).collect();
        assert_eq!(roles, vec![AgentRole::SecurityEngineer, AgentRole::QaEngineer]);
        assert_eq!(params.specialists[0].focus, vec!["Secrets"]);
        assert_eq!(params.default_model, Model::Gpt4o);
        assert_eq!(params.arbiter_model, Some(Model::ClaudeOpus45));
        assert!(params.arbiter.is_none());
        assert!(!params.auto_approve);
    }

    #[test]
    fn test_no_flags_keep_configuration() {
        let cli = parse(&["octo/app", "7"]);
        let params = cli.apply_overrides(ReviewParams::default()).unwrap();
        assert_eq!(params.specialists.len(), 5);
        assert!(params.arbiter.is_some());
        assert!(params.auto_approve);
    }

    #[test]
    fn test_role_errors() {
        let cli = parse(&["octo/app", "7", "-r", "janitor"]);
        assert!(matches!(
            cli.apply_overrides(ReviewParams::default()),
            Err(CliError::UnknownRole(_))
        ));

        let cli = parse(&["octo/app", "7", "-r", "tech_lead"]);
        assert_eq!(
            cli.apply_overrides(ReviewParams::default()).unwrap_err(),
            CliError::ArbiterAsSpecialist("tech_lead".to_string())
        );

        let cli = parse(&["octo/app", "7", "-m", " "]);
        assert_eq!(
            cli.apply_overrides(ReviewParams::default()).unwrap_err(),
            CliError::EmptyModelName("--model")
        );
    }
}
