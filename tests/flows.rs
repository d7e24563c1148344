mod common;

use std::time::Duration;

use common::{NOON_UTC, geo_body, idle_state, mocked_cli, mount_json, onecall_body};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use terminal_skies::{
    app::{
        events::AppEvent,
        state::{AppMode, AppState},
    },
    cli::Cli,
    domain::{error::LookupError, weather::WeatherIcon},
    scene::{ThemeChange, theme::Theme},
};
use tokio::sync::mpsc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Input(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

/// Feeds queued events back into the state until the lookup settles.
async fn settle(
    state: &mut AppState,
    rx: &mut mpsc::Receiver<AppEvent>,
    tx: &mpsc::Sender<AppEvent>,
    cli: &Cli,
) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let event = tokio::time::timeout_at(deadline, rx.recv())
            .await
            .expect("lookup settled in time")
            .expect("channel open");
        let done = matches!(
            event,
            AppEvent::LookupSucceeded(_) | AppEvent::LookupFailed(_)
        );
        state.handle_event(event, tx, cli).await.expect("handle event");
        if done {
            return;
        }
    }
}

async fn type_city(state: &mut AppState, tx: &mpsc::Sender<AppEvent>, cli: &Cli, city: &str) {
    state.handle_event(key(KeyCode::Char('/')), tx, cli).await.unwrap();
    for ch in city.chars() {
        state.handle_event(key(KeyCode::Char(ch)), tx, cli).await.unwrap();
    }
    state.handle_event(key(KeyCode::Enter), tx, cli).await.unwrap();
}

#[tokio::test]
async fn clear_sky_search_at_midday_turns_the_scene_sunny() {
    let server = MockServer::start().await;
    mount_json(&server, "/geo/1.0/direct", geo_body("Lisbon", 38.72, -9.14)).await;
    mount_json(&server, "/data/3.0/onecall", onecall_body(800, NOON_UTC, 0)).await;
    mount_json(&server, "/geo/1.0/reverse", geo_body("Lisbon", 38.72, -9.14)).await;

    let cli = mocked_cli(&server);
    let mut state = idle_state(&cli);
    state.scene.set_theme(Theme::Rainy, ThemeChange::manual(true));
    let (tx, mut rx) = mpsc::channel(64);

    type_city(&mut state, &tx, &cli, "Lisbon").await;
    settle(&mut state, &mut rx, &tx, &cli).await;

    assert_eq!(state.mode, AppMode::Ready);
    assert_eq!(state.card.location, "Lisbon");
    assert_eq!(state.card.temperature, "22°C");
    assert_eq!(state.card.icon, WeatherIcon::ClearDay);
    assert_eq!(state.card.hourly.len(), 12);
    assert_eq!(state.scene.theme().current(), Theme::Sunny);
    assert!(!state.scene.theme().is_locked());
    assert!((state.scene.time().target().rem_euclid(1.0) - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn unknown_city_shows_error_without_fetching_weather() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/3.0/onecall"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let cli = mocked_cli(&server);
    let mut state = idle_state(&cli);
    let theme_before = state.scene.theme().current();
    let (tx, mut rx) = mpsc::channel(64);

    type_city(&mut state, &tx, &cli, "Atlantis").await;
    settle(&mut state, &mut rx, &tx, &cli).await;

    assert_eq!(state.mode, AppMode::Error);
    assert_eq!(
        state.card.description,
        LookupError::CityNotFound("Atlantis".to_string()).to_string()
    );
    assert_eq!(state.card.temperature, "--°C");
    assert_eq!(state.scene.theme().current(), theme_before);
}

#[tokio::test]
async fn startup_city_is_looked_up_on_bootstrap() {
    let server = MockServer::start().await;
    mount_json(&server, "/geo/1.0/direct", geo_body("Oslo", 59.91, 10.75)).await;
    mount_json(&server, "/data/3.0/onecall", onecall_body(601, NOON_UTC, 3600)).await;
    mount_json(&server, "/geo/1.0/reverse", geo_body("Oslo", 59.91, 10.75)).await;

    let mut cli = mocked_cli(&server);
    cli.city = Some("Oslo".to_string());
    let mut state = idle_state(&cli);
    let (tx, mut rx) = mpsc::channel(64);

    state.handle_event(AppEvent::Bootstrap, &tx, &cli).await.unwrap();
    settle(&mut state, &mut rx, &tx, &cli).await;

    assert_eq!(state.mode, AppMode::Ready);
    assert_eq!(state.card.icon, WeatherIcon::Snow);
    assert_eq!(state.scene.theme().current(), Theme::Snowy);
    assert!((state.scene.time().target().rem_euclid(1.0) - 13.0 / 24.0).abs() < 1e-9);
}

#[tokio::test]
async fn second_search_while_loading_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(geo_body("Rome", 41.9, 12.5))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_json(&server, "/data/3.0/onecall", onecall_body(500, NOON_UTC, 0)).await;
    mount_json(&server, "/geo/1.0/reverse", geo_body("Rome", 41.9, 12.5)).await;

    let cli = mocked_cli(&server);
    let mut state = idle_state(&cli);
    let (tx, mut rx) = mpsc::channel(64);

    type_city(&mut state, &tx, &cli, "Rome").await;
    let started = rx.recv().await.expect("started");
    assert!(matches!(started, AppEvent::LookupStarted));
    state.handle_event(started, &tx, &cli).await.unwrap();
    assert_eq!(state.mode, AppMode::Loading);

    state.handle_event(key(KeyCode::Enter), &tx, &cli).await.unwrap();
    settle(&mut state, &mut rx, &tx, &cli).await;

    assert_eq!(state.mode, AppMode::Ready);
    assert_eq!(state.scene.theme().current(), Theme::Rainy);
}
