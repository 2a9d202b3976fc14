//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Select};
use unifi_ng_config::{self as config, Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::active_profile_name;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Copy of the config with plaintext passwords masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("********".into());
        }
    }
    cfg
}

fn config_detail(cfg: &Config) -> String {
    let mut lines = vec![
        format!("Config:          {}", config::config_path().display()),
        format!(
            "Default profile: {}",
            cfg.default_profile.as_deref().unwrap_or("-")
        ),
    ];

    let mut names: Vec<&String> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let Some(p) = cfg.profiles.get(name) else {
            continue;
        };
        let target = match (&p.controller, &p.host) {
            (Some(url), _) => url.clone(),
            (None, Some(host)) => format!("{host}:{}", p.port),
            (None, None) => "-".into(),
        };
        lines.push(String::new());
        lines.push(format!("[{name}]"));
        lines.push(format!("  controller: {target}"));
        lines.push(format!("  site:       {}", p.site));
        lines.push(format!("  username:   {}", p.username.as_deref().unwrap_or("-")));
        lines.push(format!(
            "  password:   {}",
            if p.password.is_some() { "plaintext" } else { "keyring / env" }
        ));
        lines.push(format!("  verify_tls: {}", p.verify_tls));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let mut cfg = config::load_config_or_default();
            eprintln!("unifi-ng configuration");
            eprintln!("   Config path: {}\n", config::config_path().display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default(active_profile_name(global, &cfg))
                .interact_text()
                .map_err(prompt_err)?;

            let host: String = Input::new()
                .with_prompt("Controller host or IP")
                .default("192.168.1.1".into())
                .interact_text()
                .map_err(prompt_err)?;

            let port: u16 = Input::new()
                .with_prompt("HTTPS port (443 for UniFi OS consoles, 8443 for self-hosted)")
                .default(443)
                .interact_text()
                .map_err(prompt_err)?;

            let site: String = Input::new()
                .with_prompt("Site name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let username: String = Input::new()
                .with_prompt("Username (local account)")
                .interact_text()
                .map_err(prompt_err)?;

            let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if username.is_empty() || password.is_empty() {
                return Err(CliError::Validation {
                    field: "credentials".into(),
                    reason: "username and password cannot be empty".into(),
                });
            }

            let store_choices = &[
                "Store password in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to store the password?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let password_field = if store_selection == 0 {
                config::store_password(&profile_name, &password)?;
                eprintln!("   Password stored in system keyring");
                None
            } else {
                Some(password)
            };

            let verify_tls = Confirm::new()
                .with_prompt("Verify the controller's TLS certificate?")
                .default(false)
                .interact()
                .map_err(prompt_err)?;

            let profile = Profile {
                host: Some(host),
                port,
                site,
                username: Some(username),
                password: password_field,
                verify_tls,
                ..Profile::default()
            };
            cfg.profiles.insert(profile_name.clone(), profile);
            if cfg.default_profile.is_none() || cfg.profiles.len() == 1 {
                cfg.default_profile = Some(profile_name.clone());
            }

            let path = config::save_config(&cfg)?;
            eprintln!("\nConfiguration written to {}", path.display());
            eprintln!("  Profile: {profile_name}");
            eprintln!("\n  Test it: unifi-ng -p {profile_name} devices list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, config_detail, |c| {
                let mut names: Vec<&String> = c.profiles.keys().collect();
                names.sort();
                names
                    .into_iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword { name } => {
            let cfg = config::load_config_or_default();
            let profile_name = name.unwrap_or_else(|| active_profile_name(global, &cfg));
            cfg.profile(&profile_name)?;

            let secret = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "value cannot be empty".into(),
                });
            }

            config::store_password(&profile_name, &secret)?;
            eprintln!("Password stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}
