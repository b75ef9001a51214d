use crate::cli::commands::profile_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::profile::{ProfileStore, UserProfile};
use crate::ui::messages::{header, success};
use crate::utils::formatting::or_dash;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Profile {
        name,
        qualification,
        facility,
        target_hours,
        reflection_length,
    } = cmd
    else {
        return Ok(());
    };

    let store = profile_store(cfg);
    let mut profile = UserProfile::from_value(&store.load()?);

    let mut changed = false;
    if let Some(v) = name {
        profile.name = v.trim().to_string();
        changed = true;
    }
    if let Some(v) = qualification {
        profile.qualification = v.trim().to_string();
        changed = true;
    }
    if let Some(v) = facility {
        profile.default_facility = v.trim().to_string();
        changed = true;
    }
    if let Some(h) = target_hours {
        if *h < 0 {
            return Err(AppError::InvalidFormat("target hours cannot be negative".into()));
        }
        profile.target_hours = Some(*h);
        changed = true;
    }
    if let Some(v) = reflection_length {
        profile.reflection_length = Some(v.clone());
        changed = true;
    }

    if changed {
        store.save(&profile.to_value()?)?;
        success(format!("Profile saved to {}", store.path().display()));
    }

    header("Profile");
    println!("Name          : {}", or_dash(Some(profile.name.as_str())));
    println!("Qualification : {}", or_dash(Some(profile.qualification.as_str())));
    println!("Facility      : {}", or_dash(Some(profile.default_facility.as_str())));
    println!(
        "Target hours  : {}",
        profile
            .target_hours
            .map(|h| h.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "Reflection    : {}",
        profile.reflection_length.as_deref().unwrap_or(&cfg.reflection_length)
    );
    Ok(())
}
