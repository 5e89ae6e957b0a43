//! Coin and flag triggers.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::clock::{ClockWriter, SetTimeScale};
use crate::config::GameConfig;
use crate::feedback::audio::{PlaySfx, Sfx};
use crate::physics::contacts::{ContactKind, ContactStarted, ContactTag};
use crate::player::state::CoinPurse;
use crate::player::{Player, PlayerContactSet};
use crate::ui::hud::CoinCounter;
use crate::ui::menus::WinScreen;

/// A trigger that already fired and must not fire again.
#[derive(Component, Debug, Default)]
pub struct Consumed;

pub struct PickupsPlugin;

impl Plugin for PickupsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, (collect_coins, reach_flag).in_set(PlayerContactSet));
    }
}

pub fn collect_coins(
    mut commands: Commands,
    mut contacts: MessageReader<ContactStarted>,
    config: Res<GameConfig>,
    mut players: Query<&mut CoinPurse, With<Player>>,
    coins: Query<(), Without<Consumed>>,
    mut counters: Query<&mut Text, With<CoinCounter>>,
    mut sfx: MessageWriter<PlaySfx>,
) {
    let mut collected = HashSet::new();
    for contact in contacts.read() {
        if contact.tag != ContactTag::Coin || contact.kind != ContactKind::Trigger {
            continue;
        }
        let Ok(mut purse) = players.get_mut(contact.body) else {
            continue;
        };
        if coins.get(contact.other).is_err() || !collected.insert(contact.other) {
            continue;
        }

        purse.coins += 1;
        sfx.write(PlaySfx::at_volume(Sfx::Coin, config.pickups.coin_volume));
        for mut text in counters.iter_mut() {
            text.0 = purse.coins.to_string();
        }
        debug!("Coin collected, {} total", purse.coins);
        commands.entity(contact.other).despawn();
    }
}

/// Shows the win screen and freezes the game. The flag fires once.
pub fn reach_flag(
    mut commands: Commands,
    mut contacts: MessageReader<ContactStarted>,
    players: Query<(), With<Player>>,
    flags: Query<(), Without<Consumed>>,
    mut win_screens: Query<&mut Visibility, With<WinScreen>>,
    mut clock: MessageWriter<SetTimeScale>,
) -> Result {
    for contact in contacts.read() {
        if contact.tag != ContactTag::Flag || contact.kind != ContactKind::Trigger {
            continue;
        }
        if players.get(contact.body).is_err() || flags.get(contact.other).is_err() {
            continue;
        }

        let mut visibility = win_screens.single_mut()?;
        *visibility = Visibility::Visible;
        clock.write(SetTimeScale::freeze(ClockWriter::WinFlag));
        commands.entity(contact.other).insert(Consumed);
        info!("Flag reached, level complete");
        break;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::shipped_config;

    #[derive(Resource, Default)]
    struct Outbox {
        sfx: Vec<PlaySfx>,
        clock: Vec<SetTimeScale>,
    }

    fn drain(mut sfx: MessageReader<PlaySfx>, mut clock: MessageReader<SetTimeScale>, mut outbox: ResMut<Outbox>) {
        outbox.sfx.extend(sfx.read().copied());
        outbox.clock.extend(clock.read().copied());
    }

    fn app() -> App {
        let mut app = App::new();
        app.insert_resource(shipped_config())
            .init_resource::<Outbox>()
            .add_message::<ContactStarted>()
            .add_message::<PlaySfx>()
            .add_message::<SetTimeScale>()
            .add_systems(Update, ((collect_coins, reach_flag), drain).chain());
        app
    }

    fn touch(app: &mut App, body: Entity, other: Entity, tag: ContactTag) {
        app.world_mut().write_message(ContactStarted {
            body,
            other,
            tag,
            kind: ContactKind::Trigger,
        });
    }

    #[test]
    fn coin_increments_purse_plays_sound_and_updates_counter() {
        let mut app = app();
        let player = app.world_mut().spawn((Player, CoinPurse::default())).id();
        let counter = app.world_mut().spawn((CoinCounter, Text::new("0"))).id();
        let coin = app.world_mut().spawn_empty().id();

        touch(&mut app, player, coin, ContactTag::Coin);
        app.update();

        assert_eq!(app.world().get::<CoinPurse>(player).unwrap().coins, 1);
        assert_eq!(app.world().get::<Text>(counter).unwrap().0, "1");
        assert!(app.world().get_entity(coin).is_err());
        assert_eq!(app.world().resource::<Outbox>().sfx, vec![PlaySfx::at_volume(Sfx::Coin, 0.4)]);
    }

    #[test]
    fn coin_without_counter_still_counts() {
        let mut app = app();
        let player = app.world_mut().spawn((Player, CoinPurse { coins: 4 })).id();
        let coin = app.world_mut().spawn_empty().id();

        touch(&mut app, player, coin, ContactTag::Coin);
        touch(&mut app, player, coin, ContactTag::Coin);
        app.update();

        assert_eq!(app.world().get::<CoinPurse>(player).unwrap().coins, 5);
    }

    #[test]
    fn flag_shows_win_screen_and_freezes_time_once() {
        let mut app = app();
        let player = app.world_mut().spawn(Player).id();
        let win = app.world_mut().spawn((WinScreen, Visibility::Hidden)).id();
        let flag = app.world_mut().spawn_empty().id();

        touch(&mut app, player, flag, ContactTag::Flag);
        app.update();
        touch(&mut app, player, flag, ContactTag::Flag);
        app.update();

        assert_eq!(app.world().get::<Visibility>(win), Some(&Visibility::Visible));
        assert!(app.world().get::<Consumed>(flag).is_some());
        assert_eq!(
            app.world().resource::<Outbox>().clock,
            vec![SetTimeScale::freeze(ClockWriter::WinFlag)]
        );
    }
}
