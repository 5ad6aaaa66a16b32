//! Headless stand-in for the player and the zombies' melee attacks.

use std::time::Duration;

use anyhow::Result;
use horde_core::{Command, EnemyId, WeaponKind};
use horde_hud::{HudFrame, HudSink};
use horde_system_session::{Outcome, Session};
use horde_world::query;

/// Combat cadence of the scripted player and the horde.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Behaviour {
    pub(crate) shot_interval: Duration,
    pub(crate) bite_damage: f32,
    pub(crate) bite_interval: Duration,
}

/// Limits of a headless run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RunLimits {
    pub(crate) frame: Duration,
    pub(crate) max_duration: Duration,
    pub(crate) hud_every: u32,
}

/// Drives the session frame by frame until the player dies or time runs out.
///
/// The player pulls the trigger on the oldest living zombie every
/// `shot_interval`, reloads whenever the magazine runs dry, and falls back
/// to the pistol once the rifle has nothing left. While any zombie is alive
/// one of them bites every `bite_interval`. Ammo boxes are collected as soon
/// as they appear.
pub(crate) fn run(
    session: &mut Session,
    behaviour: Behaviour,
    limits: RunLimits,
    hud: &mut dyn HudSink,
) -> Result<Outcome> {
    let mut elapsed = Duration::ZERO;
    let mut shot_timer = Duration::ZERO;
    let mut bite_timer = Duration::ZERO;
    let mut frame_index: u32 = 0;

    while elapsed < limits.max_duration {
        session.advance(limits.frame);
        elapsed += limits.frame;
        frame_index = frame_index.wrapping_add(1);

        let scaled = limits
            .frame
            .mul_f32(query::time_scale(session.world()).max(0.0));
        shot_timer += scaled;
        bite_timer += scaled;

        let live = query::live_enemies(session.world());
        if live.is_empty() {
            bite_timer = Duration::ZERO;
        }

        if shot_timer >= behaviour.shot_interval {
            shot_timer = Duration::ZERO;
            if let Some(target) = live.first() {
                shoot(session, *target);
            }
        }

        if !live.is_empty() && bite_timer >= behaviour.bite_interval {
            bite_timer = Duration::ZERO;
            session.submit(Command::DamagePlayer {
                amount: behaviour.bite_damage,
            });
        }

        for pickup in query::pickups(session.world()) {
            session.submit(Command::CollectPickup { pickup: pickup.id });
        }

        if limits.hud_every > 0 && frame_index % limits.hud_every == 0 {
            hud.present(&HudFrame::capture(session.world()))?;
        }

        if let Outcome::Defeated { .. } = session.outcome() {
            hud.present(&HudFrame::capture(session.world()))?;
            break;
        }
    }

    Ok(session.outcome())
}

fn shoot(session: &mut Session, target: EnemyId) {
    let weapon = choose_weapon(session);
    let magazine = query::magazine(session.world(), weapon);
    if magazine.reloading.is_some() {
        return;
    }
    if magazine.bullets_left == 0 {
        session.submit(Command::ReloadWeapon { weapon });
        return;
    }
    session.submit(Command::FireWeapon {
        weapon,
        target: Some(target),
    });
}

/// Rifle while it has rounds loaded, in reserve or on the way; pistol otherwise.
fn choose_weapon(session: &Session) -> WeaponKind {
    let world = session.world();
    let rifle = query::magazine(world, WeaponKind::Rifle);
    let usable = rifle.bullets_left > 0
        || rifle.reloading.is_some()
        || query::ammo(world).get(WeaponKind::Rifle.ammo()) > 0;
    if usable {
        WeaponKind::Rifle
    } else {
        WeaponKind::Pistol
    }
}
