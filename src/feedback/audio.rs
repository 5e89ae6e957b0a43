use bevy::audio::Volume;
use bevy::prelude::*;

use crate::config::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sfx {
    Jump,
    Hurt,
    Coin,
}

/// One-shot sound request, volume in `0.0..=1.0`.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct PlaySfx {
    pub sound: Sfx,
    pub volume: f32,
}

impl PlaySfx {
    pub fn new(sound: Sfx) -> Self {
        Self { sound, volume: 1.0 }
    }

    pub fn at_volume(sound: Sfx, volume: f32) -> Self {
        Self {
            sound,
            volume: volume.clamp(0.0, 1.0),
        }
    }
}

#[derive(Resource)]
pub struct SfxHandles {
    jump: Handle<AudioSource>,
    hurt: Handle<AudioSource>,
    coin: Handle<AudioSource>,
}

impl SfxHandles {
    fn get(&self, sound: Sfx) -> Handle<AudioSource> {
        match sound {
            Sfx::Jump => self.jump.clone(),
            Sfx::Hurt => self.hurt.clone(),
            Sfx::Coin => self.coin.clone(),
        }
    }
}

/// Plays sound effects; only added to the windowed game.
pub struct AudioFeedbackPlugin;

impl Plugin for AudioFeedbackPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                load_sfx.run_if(resource_added::<GameConfig>),
                play_sfx.run_if(resource_exists::<SfxHandles>),
            )
                .chain(),
        );
    }
}

fn load_sfx(mut commands: Commands, asset_server: Res<AssetServer>, config: Res<GameConfig>) {
    commands.insert_resource(SfxHandles {
        jump: asset_server.load(&config.sounds.jump),
        hurt: asset_server.load(&config.sounds.hurt),
        coin: asset_server.load(&config.sounds.coin),
    });
}

fn play_sfx(mut commands: Commands, mut requests: MessageReader<PlaySfx>, handles: Res<SfxHandles>) {
    for request in requests.read() {
        commands.spawn((
            AudioPlayer::new(handles.get(request.sound)),
            PlaybackSettings::DESPAWN.with_volume(Volume::Linear(request.volume)),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_is_clamped() {
        assert_eq!(PlaySfx::at_volume(Sfx::Coin, 1.5).volume, 1.0);
        assert_eq!(PlaySfx::at_volume(Sfx::Coin, 0.4).volume, 0.4);
        assert_eq!(PlaySfx::new(Sfx::Jump).volume, 1.0);
    }
}
