//! Integration tests for framepool.

use std::sync::Arc;
use std::thread;

use framepool::api::ambient;
use framepool::{
    Activation, CollectingSink, Color, LeaseState, PoolConfig, PoolError, PoolProvider, Poolable,
    PoolableContext, Preset, ScopeId,
};

const POOL_SCOPE: ScopeId = ScopeId::new(100);
const IDENTITY: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Point light: switches off as soon as a return is requested.
#[derive(Clone, Default)]
struct PointLight {
    color: Option<Color>,
    lit: bool,
}

impl Poolable for PointLight {
    fn on_borrowed(&mut self, activation: &mut Activation<'_>) {
        self.color = activation.context().tag;
        self.lit = true;
        activation.enable();
    }

    fn on_returned(&mut self, activation: &mut Activation<'_>) {
        self.lit = false;
        activation.disable();
    }

    fn on_update(&mut self, _activation: &mut Activation<'_>, _delta: f32) {}

    fn deactivate(&mut self) {
        self.lit = false;
    }
}

/// Sound emitter: fades out for `fade` seconds before disabling itself.
#[derive(Clone)]
struct SoundEmitter {
    fade: f32,
    volume: f32,
    fading: bool,
}

impl SoundEmitter {
    fn new(fade: f32) -> Self {
        Self {
            fade,
            volume: 0.0,
            fading: false,
        }
    }
}

impl Poolable for SoundEmitter {
    fn on_borrowed(&mut self, activation: &mut Activation<'_>) {
        self.volume = 1.0;
        self.fading = false;
        activation.enable();
    }

    fn on_returned(&mut self, _activation: &mut Activation<'_>) {
        self.fading = true;
    }

    fn on_update(&mut self, activation: &mut Activation<'_>, delta: f32) {
        if !self.fading {
            return;
        }
        self.volume = (self.volume - delta / self.fade).max(0.0);
        if self.volume <= 0.0 {
            activation.disable();
        }
    }
}

/// A type no preset produces.
#[derive(Clone)]
struct Decal;

impl Poolable for Decal {
    fn on_borrowed(&mut self, activation: &mut Activation<'_>) {
        activation.enable();
    }
    fn on_returned(&mut self, activation: &mut Activation<'_>) {
        activation.disable();
    }
    fn on_update(&mut self, _activation: &mut Activation<'_>, _delta: f32) {}
}

fn at_origin() -> PoolableContext {
    PoolableContext::infinite([0.0; 3], IDENTITY)
}

fn lights(prewarm: usize) -> PoolProvider {
    PoolProvider::new(PoolConfig::new(POOL_SCOPE).with_preset(Preset::new(PointLight::default(), prewarm)))
        .unwrap()
}

#[test]
fn test_prewarm_then_fallback() {
    let mut pool = lights(2);
    assert_eq!(pool.reserve_len::<PointLight>(), 2);

    let a = pool.get::<PointLight>(at_origin()).unwrap();
    let b = pool.get::<PointLight>(at_origin()).unwrap();
    assert_eq!(pool.stats().fallback_instantiations, 0);
    assert_eq!(pool.reserve_len::<PointLight>(), 0);

    let c = pool.get::<PointLight>(at_origin()).unwrap();
    assert_eq!(pool.stats().fallback_instantiations, 1);
    assert_eq!(pool.tracked_count(), 3);

    assert_ne!(a, b);
    assert_ne!(b, c);
    assert_eq!(pool.active_count(), 3);
}

#[test]
fn test_missing_preset_is_an_error() {
    let sink = Arc::new(CollectingSink::new());
    let config = PoolConfig::new(POOL_SCOPE)
        .with_preset(Preset::new(PointLight::default(), 1))
        .with_sink(sink.clone());
    let mut pool = PoolProvider::new(config).unwrap();

    let err = pool.get::<Decal>(at_origin()).unwrap_err();
    assert!(matches!(err, PoolError::NoFactoryPreset { .. }));
    assert!(err.is_configuration());
    assert_eq!(sink.codes(), vec!["FP002"]);

    // The lookup still leaves an (empty) reserve behind.
    assert!(pool.has_reserve::<Decal>());
    assert_eq!(pool.reserve_len::<Decal>(), 0);
    assert_eq!(pool.tracked_count(), 1);
}

#[test]
fn test_returned_instance_is_reused_lifo() {
    let mut pool = lights(3);
    let first = pool.get::<PointLight>(at_origin()).unwrap();
    pool.return_instance(first, false).unwrap();

    let again = pool.get::<PointLight>(at_origin()).unwrap();
    assert_eq!(first.raw().raw_index(), again.raw().raw_index());
    assert_ne!(first, again);
    assert_eq!(pool.stats().fallback_instantiations, 0);
}

#[test]
fn test_double_return_pushes_once() {
    let mut pool = lights(1);
    let light = pool.get::<PointLight>(at_origin()).unwrap();

    pool.return_instance(light, false).unwrap();
    pool.return_instance(light, false).unwrap();
    pool.return_instance(light, true).unwrap();
    pool.notify_deactivated(light).unwrap();

    assert_eq!(pool.reserve_len::<PointLight>(), 1);
    assert_eq!(pool.stats().returns_requested, 1);

    pool.get::<PointLight>(at_origin()).unwrap();
    assert!(pool.get::<PointLight>(at_origin()).is_ok());
    assert_eq!(pool.stats().fallback_instantiations, 1);
}

#[test]
fn test_finite_lifetime_auto_returns() {
    let mut pool = lights(1);
    let light = pool
        .get::<PointLight>(PoolableContext::finite(0.25, [1.0, 2.0, 3.0], IDENTITY))
        .unwrap();

    pool.tick_all(0.1);
    assert!(pool.is_active(light));
    pool.tick_all(0.1);
    assert!(pool.is_active(light));
    pool.tick_all(0.1);
    assert!(!pool.is_active(light));

    assert_eq!(pool.stats().auto_returns, 1);
    assert_eq!(pool.reserve_len::<PointLight>(), 1);
    assert_eq!(pool.lifecycle(light).unwrap().state(), LeaseState::Idle);
}

#[test]
fn test_infinite_lifetime_needs_manual_return() {
    let mut pool = lights(1);
    let light = pool.get::<PointLight>(at_origin()).unwrap();

    for _ in 0..600 {
        pool.tick_all(1.0 / 60.0);
    }
    assert!(pool.is_active(light));
    assert_eq!(pool.stats().auto_returns, 0);

    pool.return_instance(light, false).unwrap();
    assert!(!pool.is_active(light));
}

#[test]
fn test_is_active_follows_loan() {
    let mut pool = lights(1);
    let light = pool.get::<PointLight>(at_origin()).unwrap();
    assert!(pool.is_active(light));
    assert!(pool.resource(light).unwrap().lit);

    pool.return_instance(light, false).unwrap();
    assert!(!pool.is_active(light));
    assert!(!pool.resource(light).unwrap().lit);

    // The next loan of the same instance gets a fresh handle.
    let next = pool.get::<PointLight>(at_origin()).unwrap();
    assert_eq!(next.raw().raw_index(), light.raw().raw_index());
    assert!(pool.is_active(next));
    assert!(!pool.is_active(light));
    assert!(pool.resource(light).is_none());
}

#[test]
fn test_color_tag_reaches_adapter() {
    let mut pool = lights(1);
    let red = Color::rgb(1.0, 0.0, 0.0);
    let light = pool
        .get::<PointLight>(at_origin().with_color(red))
        .unwrap();
    assert_eq!(pool.resource(light).unwrap().color, Some(red));
}

#[test]
fn test_graceful_return_waits_for_fade() {
    let config = PoolConfig::new(POOL_SCOPE).with_preset(Preset::new(SoundEmitter::new(0.5), 1));
    let mut pool = PoolProvider::new(config).unwrap();
    let sound = pool.get::<SoundEmitter>(at_origin()).unwrap();

    pool.return_instance(sound, false).unwrap();
    assert!(pool.is_active(sound));
    assert!(pool.is_enabled(sound));

    pool.tick_all(0.25);
    assert!(pool.is_active(sound));
    pool.tick_all(0.25);
    assert!(!pool.is_active(sound));
    assert!(!pool.is_enabled(sound));
    assert_eq!(pool.reserve_len::<SoundEmitter>(), 1);
}

#[test]
fn test_immediate_return_cuts_fade() {
    let config = PoolConfig::new(POOL_SCOPE).with_preset(Preset::new(SoundEmitter::new(0.5), 1));
    let mut pool = PoolProvider::new(config).unwrap();
    let sound = pool.get::<SoundEmitter>(at_origin()).unwrap();

    pool.return_instance(sound, true).unwrap();
    assert!(!pool.is_active(sound));
    assert_eq!(pool.reserve_len::<SoundEmitter>(), 1);
}

#[test]
fn test_return_all() {
    let config = PoolConfig::new(POOL_SCOPE)
        .with_preset(Preset::new(PointLight::default(), 2))
        .with_preset(Preset::new(SoundEmitter::new(1.0), 1));
    let mut pool = PoolProvider::new(config).unwrap();

    pool.get::<PointLight>(at_origin()).unwrap();
    pool.get::<PointLight>(at_origin()).unwrap();
    pool.get::<SoundEmitter>(at_origin()).unwrap();
    assert_eq!(pool.active_count(), 3);

    pool.return_all(true);
    assert_eq!(pool.active_count(), 0);
    assert_eq!(pool.reserve_len::<PointLight>(), 2);
    assert_eq!(pool.reserve_len::<SoundEmitter>(), 1);
}

#[test]
fn test_reparent_only_on_scope_change() {
    let mut pool = lights(1);
    let turret = ScopeId::new(7);

    let light = pool.get::<PointLight>(at_origin().with_scope(turret)).unwrap();
    assert_eq!(pool.transform(light).unwrap().scope, turret);
    assert_eq!(pool.stats().reparents, 1);
    pool.return_instance(light, false).unwrap();

    // The instance stays under its last scope while idle.
    assert_eq!(pool.transform(light).unwrap().scope, turret);

    pool.get::<PointLight>(at_origin().with_scope(turret)).unwrap();
    assert_eq!(pool.stats().reparents, 1);
}

#[test]
fn test_placement_applied_on_borrow() {
    let mut pool = lights(1);
    let rotation = [0.0, 0.7071, 0.0, 0.7071];
    let light = pool
        .get::<PointLight>(PoolableContext::infinite([4.0, 0.0, -2.0], rotation).with_scale([2.0; 3]))
        .unwrap();

    let placement = pool.transform(light).unwrap().placement;
    assert_eq!(placement.position, [4.0, 0.0, -2.0]);
    assert_eq!(placement.rotation, rotation);
    assert_eq!(placement.scale, [2.0; 3]);
}

#[test]
fn test_missing_pool_scope() {
    let sink = Arc::new(CollectingSink::new());
    let config = PoolConfig::default()
        .with_preset(Preset::new(PointLight::default(), 1))
        .with_sink(sink.clone());

    let err = PoolProvider::new(config).unwrap_err();
    assert_eq!(err, PoolError::MissingPoolScope);
    assert!(sink.has_errors());
}

#[test]
fn test_duplicate_preset_rejected() {
    let config = PoolConfig::new(POOL_SCOPE)
        .with_preset(Preset::new(PointLight::default(), 1))
        .with_preset(Preset::new(PointLight::default(), 4));

    let err = PoolProvider::new(config).unwrap_err();
    assert!(matches!(err, PoolError::AmbiguousPreset { .. }));
}

#[test]
fn test_duplicate_preset_first_wins_when_allowed() {
    let config = PoolConfig::new(POOL_SCOPE)
        .with_preset(Preset::new(SoundEmitter::new(0.1), 0))
        .with_preset(Preset::new(SoundEmitter::new(9.0), 0))
        .allow_duplicate_presets(true);
    let mut pool = PoolProvider::new(config).unwrap();

    let sound = pool.get::<SoundEmitter>(at_origin()).unwrap();
    assert_eq!(pool.resource(sound).unwrap().fade, 0.1);
}

#[test]
fn test_notifier_from_worker_thread() {
    let mut pool = lights(4);
    let handles: Vec<_> = (0..4)
        .map(|_| pool.get::<PointLight>(at_origin()).unwrap())
        .collect();

    let workers: Vec<_> = handles
        .iter()
        .map(|&handle| {
            let notifier = pool.notifier();
            thread::spawn(move || notifier.notify(handle))
        })
        .collect();
    for worker in workers {
        assert!(worker.join().unwrap());
    }

    assert_eq!(pool.pump_notifications(), 4);
    assert_eq!(pool.active_count(), 0);
    assert_eq!(pool.reserve_len::<PointLight>(), 4);
}

#[test]
fn test_signal_for_earlier_loan_is_dropped() {
    let mut pool = lights(1);
    let notifier = pool.notifier();

    let first = pool.get::<PointLight>(at_origin()).unwrap();
    assert!(notifier.notify(first));
    pool.return_instance(first, true).unwrap();

    // Same instance, new loan, before the queued signal is drained.
    let second = pool.get::<PointLight>(at_origin()).unwrap();
    assert_eq!(second.raw().raw_index(), first.raw().raw_index());

    pool.tick_all(0.0);
    assert!(pool.is_active(second));
    assert_eq!(pool.reserve_len::<PointLight>(), 0);
    assert_eq!(pool.stats().stale_signals, 1);

    // The next borrower must get a different instance.
    let third = pool.get::<PointLight>(at_origin()).unwrap();
    assert_ne!(third.raw().raw_index(), second.raw().raw_index());
    assert_eq!(pool.stats().fallback_instantiations, 1);
}

#[test]
fn test_earlier_handle_cannot_touch_next_loan() {
    let sink = Arc::new(CollectingSink::new());
    let config = PoolConfig::new(POOL_SCOPE)
        .with_preset(Preset::new(PointLight::default(), 1))
        .with_sink(sink.clone());
    let mut pool = PoolProvider::new(config).unwrap();

    let old = pool.get::<PointLight>(at_origin()).unwrap();
    pool.return_instance(old, true).unwrap();
    let current = pool.get::<PointLight>(at_origin()).unwrap();

    assert_eq!(pool.return_instance(old, true), Err(PoolError::StaleHandle));
    assert_eq!(pool.notify_deactivated(old), Err(PoolError::StaleHandle));
    assert_eq!(pool.tick(old, 1.0), Err(PoolError::StaleHandle));
    assert!(pool.resource_mut(old).is_none());

    assert!(pool.is_active(current));
    assert_eq!(pool.reserve_len::<PointLight>(), 0);
    assert_eq!(sink.codes(), vec!["FP302", "FP302", "FP302"]);
}

#[test]
fn test_pump_counts_only_reclaimed() {
    let mut pool = lights(2);
    let light = pool.get::<PointLight>(at_origin()).unwrap();
    let notifier = pool.notifier();

    assert!(notifier.notify(light));
    assert!(notifier.notify(light));
    assert_eq!(pool.pending_notifications(), 2);

    assert_eq!(pool.pump_notifications(), 1);
    assert_eq!(pool.pending_notifications(), 0);
    assert_eq!(pool.reserve_len::<PointLight>(), 2);
    assert_eq!(pool.stats().stale_signals, 0);
}

#[test]
fn test_notifier_after_provider_dropped() {
    let mut pool = lights(1);
    let light = pool.get::<PointLight>(at_origin()).unwrap();
    let notifier = pool.notifier();
    pool.return_instance(light, true).unwrap();
    drop(pool);

    assert!(!notifier.is_connected());
    assert!(!notifier.notify(light));
}

#[test]
fn test_handle_from_other_provider() {
    let mut a = lights(1);
    let mut b = lights(1);
    let light = a.get::<PointLight>(at_origin()).unwrap();

    assert_eq!(b.tick(light, 0.1), Err(PoolError::ForeignHandle));
    assert_eq!(b.notify_deactivated(light), Err(PoolError::ForeignHandle));
    assert!(!b.is_active(light));
}

#[test]
fn test_teardown_with_loans_reports() {
    let sink = Arc::new(CollectingSink::new());
    let config = PoolConfig::new(POOL_SCOPE)
        .with_preset(Preset::new(PointLight::default(), 2))
        .with_sink(sink.clone());
    let mut pool = PoolProvider::new(config).unwrap();

    let kept = pool.get::<PointLight>(at_origin()).unwrap();
    let returned = pool.get::<PointLight>(at_origin()).unwrap();
    pool.return_instance(returned, false).unwrap();
    assert!(pool.is_active(kept));
    drop(pool);

    assert_eq!(sink.codes(), vec!["FP202"]);
}

#[test]
fn test_clean_teardown_is_silent() {
    let sink = Arc::new(CollectingSink::new());
    let config = PoolConfig::new(POOL_SCOPE)
        .with_preset(Preset::new(PointLight::default(), 2))
        .with_sink(sink.clone());
    let mut pool = PoolProvider::new(config).unwrap();

    let light = pool.get::<PointLight>(at_origin()).unwrap();
    pool.return_instance(light, true).unwrap();
    drop(pool);

    assert!(sink.codes().is_empty());
}

#[test]
fn test_stats_report() {
    let mut pool = lights(1);
    for _ in 0..4 {
        let light = pool.get::<PointLight>(PoolableContext::finite(0.1, [0.0; 3], IDENTITY)).unwrap();
        pool.tick(light, 0.2).unwrap();
    }

    let stats = pool.stats();
    assert_eq!(stats.borrows, 4);
    assert_eq!(stats.auto_returns, 4);
    assert_eq!(stats.reclaimed, 4);
    assert_eq!(stats.fallback_instantiations, 0);
    assert!((stats.reuse_ratio() - 1.0).abs() < f64::EPSILON);
    assert!(stats.to_string().contains("Borrows:"));
}

// ============ AMBIENT PROVIDER ============

#[test]
fn test_ambient_provider_per_thread() {
    let id = ambient::install(lights(1)).unwrap();
    assert_eq!(ambient::install(lights(1)), Err(PoolError::ProviderAlreadyInstalled));

    // Another thread has its own slot.
    let other = thread::spawn(|| ambient::is_installed()).join().unwrap();
    assert!(!other);

    let light = ambient::with_provider(|pool| pool.get::<PointLight>(at_origin()).unwrap()).unwrap();
    assert_eq!(light.provider(), id);

    ambient::with_provider(|pool| pool.return_instance(light, true))
        .unwrap()
        .unwrap();
    let pool = ambient::teardown().unwrap();
    assert_eq!(pool.active_count(), 0);
}
