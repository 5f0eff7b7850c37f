// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Application state and event handling.
//!
//! All state lives here and is mutated only on the main loop. Network
//! calls run on spawned worker threads that report back over an mpsc
//! channel; results are applied atomically between frames, so a frame
//! never sees a half-applied route or fix.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use log::warn;
use ratatui::layout::Rect;
use roadradar_core::{
    geo, NavState, NavigationTracker, PanController, PositionSample, Route, Theme, TrackerEvent,
    ViewState,
};
use roadradar_providers::places::{parse_coordinates, NominatimClient, Place};
use roadradar_providers::position::IpLocator;
use roadradar_providers::routing::OsrmClient;
use roadradar_providers::simulate::RouteSimulator;

use crate::settings::Settings;

/// How long a status notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Simulated ground covered per poll tick, roughly city driving at the
/// default interval.
const SIM_STEP_M: f64 = 150.0;
const SIM_JITTER_M: f64 = 3.0;

/// Destination names come from geocoder display strings; keep the part
/// that fits the panels.
const DEST_NAME_LIMIT: usize = 20;

/// Results delivered from worker threads.
#[derive(Debug)]
pub enum WorkerMsg {
    PositionFixed(Result<PositionSample, String>),
    RouteReady {
        name: String,
        result: Result<Route, String>,
    },
    PlacesFound {
        query: String,
        result: Result<Vec<Place>, String>,
    },
}

pub struct App {
    pub settings: Settings,
    pub theme: Theme,
    pub tracker: NavigationTracker,
    pub view: ViewState,
    pub pan: PanController,
    pub position: Option<PositionSample>,
    pub destination_name: Option<String>,
    pub tracking: bool,
    pub simulate: bool,
    pub simulator: Option<RouteSimulator>,
    pub search_open: bool,
    pub search_input: String,
    pub suggestions: Vec<Place>,
    pub selected_suggestion: usize,
    pub searching: bool,
    pub fetching_route: bool,
    pub notice: Option<(String, Instant)>,
    pub should_quit: bool,
    /// Inner rectangle of the radar pane, refreshed each frame; mouse
    /// drags only start inside it.
    pub radar_area: Rect,
    last_poll: Instant,
    tx: Sender<WorkerMsg>,
    rx: Receiver<WorkerMsg>,
}

impl App {
    pub fn new(settings: Settings, simulate: bool) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            theme: Theme::by_name(&settings.theme),
            tracker: NavigationTracker::new(settings.policy),
            view: ViewState::default(),
            pan: PanController::default(),
            position: None,
            destination_name: None,
            tracking: false,
            simulate,
            simulator: None,
            search_open: false,
            search_input: String::new(),
            suggestions: Vec::new(),
            selected_suggestion: 0,
            searching: false,
            fetching_route: false,
            notice: None,
            should_quit: false,
            radar_area: Rect::default(),
            last_poll: Instant::now(),
            settings,
            tx,
            rx,
        }
    }

    /// Seed a fix without any provider, e.g. from `--at`.
    pub fn set_manual_position(&mut self, point: roadradar_core::GeoPoint) {
        self.apply_position(PositionSample {
            point,
            label: "manual".to_string(),
        });
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::info!("Notice — text={}", text);
        self.notice = Some((text, Instant::now()));
    }

    /// Current notice text, if it has not expired.
    pub fn active_notice(&self) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|(_, at)| at.elapsed() < NOTICE_TTL)
            .map(|(text, _)| text.as_str())
    }

    /// Scene snapshot for the rasterizer.
    pub fn scene(&self) -> roadradar_core::radar::Scene<'_> {
        let active_step = match self.tracker.state() {
            NavState::EnRoute(index) => Some(index),
            _ => None,
        };
        roadradar_core::radar::Scene {
            position: self.position.as_ref().map(|s| s.point),
            route: self.tracker.route(),
            active_step,
            destination_name: self.destination_name.as_deref(),
        }
    }

    // --- main-loop hooks ---

    /// Fires the tracking timer when due.
    pub fn tick(&mut self) {
        if !self.tracking {
            return;
        }
        let interval = Duration::from_secs(self.settings.policy.poll_interval_s.max(1));
        if self.last_poll.elapsed() >= interval {
            self.last_poll = Instant::now();
            self.refresh_position();
        }
    }

    /// Drain and apply everything the workers have sent.
    pub fn pump(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.apply(msg);
        }
    }

    pub fn apply(&mut self, msg: WorkerMsg) {
        match msg {
            WorkerMsg::PositionFixed(Ok(sample)) => self.apply_position(sample),
            WorkerMsg::PositionFixed(Err(e)) => {
                warn!("Position lookup failed — error={}", e);
                self.notify("Position lookup failed");
            }
            WorkerMsg::RouteReady { name, result } => {
                self.fetching_route = false;
                match result {
                    Ok(route) => self.adopt_route(name, route),
                    Err(e) => {
                        warn!("Route fetch failed — dest={} error={}", name, e);
                        self.notify("Route fetch failed");
                    }
                }
            }
            WorkerMsg::PlacesFound { query, result } => {
                // Stale replies for superseded queries are dropped.
                if !self.search_open || query != self.search_input.trim() {
                    return;
                }
                self.searching = false;
                match result {
                    Ok(places) => {
                        self.suggestions = places;
                        self.selected_suggestion = 0;
                    }
                    Err(e) => {
                        warn!("Place search failed — query={} error={}", query, e);
                        self.notify("Search failed");
                    }
                }
            }
        }
    }

    // --- commands ---

    pub fn refresh_position(&mut self) {
        if self.simulate {
            if let Some(fix) = self.simulator.as_mut().and_then(|s| s.next_fix()) {
                self.apply_position(fix);
            }
            return;
        }

        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = IpLocator::new()
                .current_position()
                .map_err(|e| e.to_string());
            let _ = tx.send(WorkerMsg::PositionFixed(result));
        });
    }

    pub fn toggle_tracking(&mut self) {
        self.tracking = !self.tracking;
        if self.tracking {
            let every = self.settings.policy.poll_interval_s;
            self.notify(format!("Tracking on: refresh every {}s", every));
            self.last_poll = Instant::now();
            self.refresh_position();
        } else {
            self.notify("Tracking off");
        }
    }

    pub fn clear_route(&mut self) {
        self.tracker.clear();
        self.destination_name = None;
        self.simulator = None;
        self.tracking = false;
        self.notify("Route cleared");
    }

    pub fn open_search(&mut self) {
        self.search_open = true;
        self.search_input.clear();
        self.suggestions.clear();
        self.selected_suggestion = 0;
        self.searching = false;
    }

    pub fn close_search(&mut self) {
        self.search_open = false;
        self.search_input.clear();
        self.suggestions.clear();
        self.searching = false;
    }

    /// Re-derive suggestions for the current input: coordinate literals
    /// resolve locally, anything else goes to the geocoder worker.
    fn update_suggestions(&mut self) {
        let query = self.search_input.trim().to_string();
        if query.len() < 2 {
            self.suggestions.clear();
            self.selected_suggestion = 0;
            self.searching = false;
            return;
        }

        if let Some(point) = parse_coordinates(&query) {
            self.suggestions = vec![Place {
                name: format!("{:.4}, {:.4}", point.lat, point.lon),
                point,
            }];
            self.selected_suggestion = 0;
            self.searching = false;
            return;
        }

        self.searching = true;
        let near = self.position.as_ref().map(|s| s.point);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = NominatimClient::new()
                .search(&query, near)
                .map_err(|e| e.to_string());
            let _ = tx.send(WorkerMsg::PlacesFound { query, result });
        });
    }

    fn confirm_search(&mut self) {
        let Some(place) = self.suggestions.get(self.selected_suggestion).cloned() else {
            return;
        };
        self.close_search();

        let short_name: String = place
            .name
            .split(',')
            .next()
            .unwrap_or(&place.name)
            .trim()
            .chars()
            .take(DEST_NAME_LIMIT)
            .collect();
        self.request_route(short_name, place.point);
    }

    pub fn request_route(&mut self, name: String, dest: roadradar_core::GeoPoint) {
        let Some(from) = self.position.as_ref().map(|s| s.point) else {
            self.notify("No position yet. Press r for a fix.");
            return;
        };

        self.fetching_route = true;
        self.notify(format!("Routing to {}...", name));

        let url = self.settings.osrm_url.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = OsrmClient::with_base_url(url)
                .fetch_route(from, dest)
                .map_err(|e| e.to_string());
            let _ = tx.send(WorkerMsg::RouteReady { name, result });
        });
    }

    // --- input events ---

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Ctrl-C quits even while the search overlay eats plain keys.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.search_open {
            self.handle_search_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('d') => self.open_search(),
            KeyCode::Char('r') => {
                self.notify("Refreshing position...");
                self.refresh_position();
            }
            KeyCode::Char('t') => self.toggle_tracking(),
            KeyCode::Char('c') => self.clear_route(),
            KeyCode::Char('n') => {
                self.tracker.advance_step();
            }
            KeyCode::Char('p') => {
                self.tracker.retreat_step();
            }
            KeyCode::Char('0') | KeyCode::Esc => self.view.recenter(),
            KeyCode::Left => self.view.pan_by(2, 0),
            KeyCode::Right => self.view.pan_by(-2, 0),
            KeyCode::Up => self.view.pan_by(0, 1),
            KeyCode::Down => self.view.pan_by(0, -1),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.close_search(),
            KeyCode::Enter => self.confirm_search(),
            KeyCode::Up => {
                self.selected_suggestion = self.selected_suggestion.saturating_sub(1);
            }
            KeyCode::Down => {
                if !self.suggestions.is_empty() {
                    self.selected_suggestion =
                        (self.selected_suggestion + 1).min(self.suggestions.len() - 1);
                }
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                self.update_suggestions();
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.update_suggestions();
            }
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let x = i32::from(mouse.column);
        let y = i32::from(mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.radar_area.contains(ratatui::layout::Position {
                    x: mouse.column,
                    y: mouse.row,
                }) {
                    self.pan.begin_drag(x, y);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((dx, dy)) = self.pan.drag_to(x, y) {
                    self.view.pan_by(dx, dy);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.pan.end_drag(),
            _ => {}
        }
    }

    // --- internals ---

    fn apply_position(&mut self, sample: PositionSample) {
        let point = sample.point;
        self.position = Some(sample);

        match self.tracker.update(Some(point)) {
            TrackerEvent::StepAdvanced { name, .. } => {
                self.notify(format!("Next: {}", name));
            }
            TrackerEvent::Arrived => {
                self.tracking = false;
                self.notify("Arrived at destination");
            }
            TrackerEvent::Unchanged => {}
        }
    }

    fn adopt_route(&mut self, name: String, route: Route) {
        let summary = format!(
            "Route: {}, {}",
            geo::format_distance(route.total_distance_m),
            geo::format_duration(route.total_duration_s)
        );
        if self.simulate {
            self.simulator = Some(RouteSimulator::along(&route, SIM_STEP_M, SIM_JITTER_M));
        }
        match self.tracker.install_route(route) {
            Ok(()) => {
                self.destination_name = Some(name);
                self.view.recenter();
                self.notify(summary);
            }
            Err(e) => {
                warn!("Route rejected — dest={} error={}", name, e);
                self.simulator = None;
                self.notify("Route unusable");
            }
        }
    }
}
