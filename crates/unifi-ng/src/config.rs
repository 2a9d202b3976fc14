//! CLI-side configuration: global-flag overrides on top of the profile
//! loaded by `unifi_ng_config`, then translation to a `SessionConfig`.

use clap::ArgMatches;
use clap::ValueEnum;
use clap::parser::ValueSource;
use unifi_ng_api::SessionConfig;
use unifi_ng_config::{self as config, Config, Profile};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    cfg.active_profile_name(global.profile.as_deref())
}

/// Pick the profile to start from.
///
/// An explicitly named profile must exist. Without one, a missing default
/// profile is fine as long as the flags name a controller.
fn base_profile(global: &GlobalOpts, cfg: &Config, name: &str) -> Result<Profile, CliError> {
    if let Some(profile) = cfg.profiles.get(name) {
        return Ok(profile.clone());
    }

    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: name.into(),
            available: cfg.available_profiles(),
        });
    }

    if global.controller.is_none() && global.host.is_none() {
        return Err(CliError::NoConfig {
            path: config::config_path().display().to_string(),
        });
    }

    Ok(Profile::default())
}

/// Apply global flags over a profile. Flags win; `--host` drops a
/// profile-level controller URL.
pub fn apply_overrides(mut profile: Profile, global: &GlobalOpts, cfg: &Config) -> Profile {
    if let Some(ref host) = global.host {
        profile.host = Some(host.clone());
        profile.controller = None;
    }
    if let Some(ref controller) = global.controller {
        profile.controller = Some(controller.clone());
    }
    if let Some(port) = global.port {
        profile.port = port;
    }
    if let Some(ref site) = global.site {
        profile.site = site.clone();
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.verify_tls {
        profile.verify_tls = true;
    }
    profile.timeout = global
        .timeout
        .or(profile.timeout)
        .or(cfg.defaults.timeout);
    profile
}

/// Use the config file's `defaults.output` when neither `--output` nor
/// `UNIFI_NG_OUTPUT` was given. An unknown format name is ignored.
pub fn apply_output_default(global: &mut GlobalOpts, matches: &ArgMatches, cfg: &Config) {
    if matches.value_source("output") != Some(ValueSource::DefaultValue) {
        return;
    }
    match OutputFormat::from_str(&cfg.defaults.output, true) {
        Ok(format) => global.output = format,
        Err(_) => tracing::warn!(
            value = %cfg.defaults.output,
            "ignoring unknown defaults.output"
        ),
    }
}

/// Build a `SessionConfig` from the config file, profile, and CLI overrides.
pub fn build_session_config(global: &GlobalOpts) -> Result<SessionConfig, CliError> {
    let cfg = config::load_config_or_default();
    let name = active_profile_name(global, &cfg);

    let profile = apply_overrides(base_profile(global, &cfg, &name)?, global, &cfg);
    tracing::debug!(profile = %name, "resolved profile");

    Ok(config::profile_to_session_config(
        &profile,
        &name,
        global.password.as_deref(),
    )?)
}
