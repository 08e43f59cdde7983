//! Player-proximity detection around each NPC.

use bevy::prelude::*;

use crate::shared::*;

/// Last frame's in-radius flag, so crossings emit exactly one event each way.
#[derive(Component, Debug, Default)]
pub struct PresenceTracked {
    pub player_inside: bool,
}

pub fn detect_presence(
    player: Query<&Transform, With<Player>>,
    mut npcs: Query<(Entity, &Transform, &mut PresenceTracked), With<Npc>>,
    mut writer: EventWriter<PresenceEvent>,
) {
    let Ok(player_transform) = player.get_single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (entity, transform, mut tracked) in &mut npcs {
        let inside = transform.translation.truncate().distance(player_pos) <= PRESENCE_RADIUS;
        if inside != tracked.player_inside {
            tracked.player_inside = inside;
            let kind = if inside {
                PresenceKind::Entered
            } else {
                PresenceKind::Exited
            };
            writer.send(PresenceEvent { npc: entity, kind });
        }
    }
}
