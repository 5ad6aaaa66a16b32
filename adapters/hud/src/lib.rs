#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Heads-up display contracts for Horde Survival adapters.
//!
//! A [`HudFrame`] is a plain text snapshot of everything the overlay shows.
//! It is derived from world queries only, so any presentation layer can
//! render it without touching simulation state.

use std::time::Duration;

use anyhow::Result as AnyResult;
use horde_core::WeaponKind;
use horde_world::{query, World};

/// Text and visibility of every HUD element for one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HudFrame {
    /// Number of the current wave, e.g. `Wave 3`.
    pub wave_label: String,
    /// Whole seconds left in the cooldown; hidden while no cooldown runs.
    pub cooldown_counter: Option<u64>,
    /// Banner announcing the cleared wave; shown during the cooldown.
    pub wave_over_banner: Option<String>,
    /// Warning about an upcoming boss wave.
    pub boss_warning: Option<String>,
    /// Player health, e.g. `Health:80/100`.
    pub health_label: String,
    /// Rifle magazine and reserve, e.g. `Rifle: 12/60`.
    pub rifle_ammo_label: String,
    /// Pistol magazine and reserve, e.g. `Pistol: 7/0`.
    pub pistol_ammo_label: String,
    /// Banner shown once the player died.
    pub defeat_banner: Option<String>,
}

impl HudFrame {
    /// Captures the HUD state from the provided world.
    #[must_use]
    pub fn capture(world: &World) -> Self {
        let status = query::wave_status(world);
        let player = query::player(world);
        let ammo = query::ammo(world);

        let wave = status.current.map_or(0, |wave| wave.get());
        let cooldown = status.cooldown;

        Self {
            wave_label: format!("Wave {wave}"),
            cooldown_counter: cooldown.map(|cooldown| ceil_seconds(cooldown.remaining)),
            wave_over_banner: cooldown
                .map(|cooldown| format!("Wave {} cleared", cooldown.wave.get())),
            boss_warning: status
                .boss_announced
                .map(|wave| format!("Boss incoming in wave {}", wave.get())),
            health_label: format!(
                "Health:{}/{}",
                player.health.round(),
                player.max_health.round()
            ),
            rifle_ammo_label: ammo_label(world, WeaponKind::Rifle, ammo.rifle),
            pistol_ammo_label: ammo_label(world, WeaponKind::Pistol, ammo.pistol),
            defeat_banner: player
                .dead
                .then(|| format!("You died on wave {wave}")),
        }
    }

    /// Lines of every visible element, top to bottom.
    #[must_use]
    pub fn visible_lines(&self) -> Vec<String> {
        let mut lines = vec![self.wave_label.clone()];
        if let Some(seconds) = self.cooldown_counter {
            lines.push(format!("Next wave in {seconds}"));
        }
        lines.extend(self.wave_over_banner.iter().cloned());
        lines.extend(self.boss_warning.iter().cloned());
        lines.push(self.health_label.clone());
        lines.push(self.rifle_ammo_label.clone());
        lines.push(self.pistol_ammo_label.clone());
        lines.extend(self.defeat_banner.iter().cloned());
        lines
    }
}

/// UI collaborator that presents HUD frames.
pub trait HudSink {
    /// Presents the provided frame.
    fn present(&mut self, frame: &HudFrame) -> AnyResult<()>;
}

fn ammo_label(world: &World, weapon: WeaponKind, reserve: u32) -> String {
    let name = match weapon {
        WeaponKind::Rifle => "Rifle",
        WeaponKind::Pistol => "Pistol",
    };
    let magazine = query::magazine(world, weapon);
    let suffix = if magazine.reloading.is_some() {
        " (reloading)"
    } else {
        ""
    };
    format!("{name}: {}/{reserve}{suffix}", magazine.bullets_left)
}

fn ceil_seconds(remaining: Duration) -> u64 {
    remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
}
