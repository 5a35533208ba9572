// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two dropdowns on one page, driven by a scripted click session.
//!
//! This example shows:
//! - binding dropdowns from trigger attributes,
//! - mutual exclusion when a second dropdown opens,
//! - clicks inside a menu vs. outside it,
//! - close requests by `drop-down-id` and the outbound broadcast they produce,
//! - `tab-alive` disabling a trigger.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example dropdown_session`

use kurbo::{Point, Rect};
use tracing::info;
use tracing_subscriber::EnvFilter;
use understory_dropdown::{Broadcast, Callbacks, EventType, ListenPhase, Outcome, Page};
use understory_element_tree::{Element, ElementId};

fn toolbar_button(page: &mut Page, x: f64, label: &str, id: &str) -> (ElementId, ElementId) {
    let body = page.document().body();
    let doc = page.document_mut();
    let wrap = doc.insert(
        Some(body),
        Element::new("div").with_bounds(Rect::new(x, 10.0, x + 160.0, 40.0)),
    );
    let trigger = doc.insert(
        Some(wrap),
        Element::new("button")
            .with_attribute("drop-down-id", id)
            .with_attribute("automatic-position", "")
            .with_attribute("focus-on-open", "input")
            .with_attribute("tab-alive", "true")
            .with_attribute("value", label)
            .with_bounds(Rect::new(0.0, 0.0, 120.0, 30.0)),
    );
    let menu = doc.insert(
        Some(wrap),
        Element::new("ul").with_bounds(Rect::new(0.0, 0.0, 160.0, 120.0)),
    );
    doc.insert(
        Some(menu),
        Element::new("input")
            .focusable()
            .with_bounds(Rect::new(4.0, 4.0, 156.0, 28.0)),
    );
    doc.insert(
        Some(wrap),
        Element::new("i")
            .with_class("open-drop-down")
            .with_class("banana-arrow-down5")
            .with_bounds(Rect::new(124.0, 8.0, 140.0, 24.0)),
    );
    (trigger, menu)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut page = Page::new();
    let (sort, sort_menu) = toolbar_button(&mut page, 10.0, "name", "sort");
    let (filter, _) = toolbar_button(&mut page, 200.0, "all", "filter");

    let sort_id = page
        .bind_dropdown(
            sort,
            Callbacks::new()
                .on_open(|| info!("sort menu opened"))
                .on_close(|| info!("sort order changed")),
        )
        .expect("sort trigger has a menu");
    let filter_id = page
        .bind_dropdown(filter, Callbacks::new().on_open(|| info!("filter menu opened")))
        .expect("filter trigger has a menu");

    let root = page.document().root();
    page.listen(root, EventType::Click, ListenPhase::Bubble, |_, ev| {
        info!(target_element = ?ev.target, "click reached the document root");
        Outcome::Continue
    });

    info!("open sort, then pick an entry inside its menu");
    page.click(sort);
    let at = page
        .document()
        .world_bounds(sort_menu)
        .map(|r| r.center())
        .unwrap_or(Point::ZERO);
    page.click_at(at);
    page.set_attribute(sort, "value", "date");
    info!(open = page.is_open(sort_id), focused = ?page.document().focused(), "after menu click");

    info!("opening filter closes sort");
    page.click(filter);
    info!(
        sort = page.is_open(sort_id),
        filter = page.is_open(filter_id),
        "mutual exclusion"
    );

    info!("close filter by id");
    page.broadcast(&Broadcast::close("filter"));
    for msg in page.drain_broadcasts() {
        info!(?msg, "outbound broadcast");
    }

    info!("disable sort via tab-alive");
    page.set_attribute(sort, "tab-alive", "false");
    page.click(sort);
    info!(
        open = page.is_open(sort_id),
        enabled = page.is_enabled(sort_id),
        "click on disabled trigger"
    );

    page.destroy(sort_id).expect("sort is bound");
    page.destroy(filter_id).expect("filter is bound");
    info!(menu_alive = page.document().is_alive(sort_menu), "torn down");
}
