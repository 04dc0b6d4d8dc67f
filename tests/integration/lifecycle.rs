//! Integration tests for subscriptions across mount and unmount

use super::support::*;
use canopy::{create_context, Context, Element, Renderer, TreeError};
use std::cell::Cell;
use std::rc::Rc;

/// App body whose consumer can be toggled off between renders.
fn toggled(ctx: &Context<Data>, show: &Rc<Cell<bool>>, consumed: &Log<String>) -> Slot {
    let ctx = ctx.clone();
    let show = Rc::clone(show);
    let consumed = Rc::clone(consumed);
    Slot::new(move || {
        let ctx = ctx.clone();
        let show = Rc::clone(&show);
        let consumed = Rc::clone(&consumed);
        passthrough(Slot::new(move || {
            if show.get() {
                let consumed = Rc::clone(&consumed);
                ctx.consumer(move |data| recorder("span", data.a, &consumed))
            } else {
                Element::Empty
            }
        }))
    })
}

#[test]
fn test_unmounted_consumer_receives_nothing() {
    let ctx = create_context(Data { a: "" });
    let show = Rc::new(Cell::new(true));
    let consumed = log::<String>();
    let body = toggled(&ctx, &show, &consumed);

    let mut renderer = Renderer::new();
    renderer.render(app(&ctx, &Rc::new(Data { a: "a" }), &body)).unwrap();
    let provider = renderer.providers_of(&ctx)[0];
    assert_eq!(renderer.subscribers(provider).unwrap().len(), 1);

    show.set(false);
    for next in ["b", "c", "d"] {
        renderer.render(app(&ctx, &Rc::new(Data { a: next }), &body)).unwrap();
    }

    assert_eq!(*consumed.borrow(), vec!["a".to_string()]);
    assert!(renderer.subscribers(provider).unwrap().is_empty());
    assert!(renderer.consumers_of(&ctx).is_empty());
    assert_eq!(renderer.stats().forced_deliveries, 0);
}

#[test]
fn test_remounted_consumer_resolves_current_value() {
    let ctx = create_context(Data { a: "" });
    let show = Rc::new(Cell::new(false));
    let consumed = log::<String>();
    let body = toggled(&ctx, &show, &consumed);

    let mut renderer = Renderer::new();
    renderer.render(app(&ctx, &Rc::new(Data { a: "a" }), &body)).unwrap();
    assert_eq!(renderer.to_html(), "");

    show.set(true);
    renderer.render(app(&ctx, &Rc::new(Data { a: "b" }), &body)).unwrap();

    assert_eq!(*consumed.borrow(), vec!["b".to_string()]);
    assert_eq!(renderer.to_html(), "<span>b</span>");
    let provider = renderer.providers_of(&ctx)[0];
    assert_eq!(renderer.subscribers(provider).unwrap(), renderer.consumers_of(&ctx));
}

#[test]
fn test_consumer_dropped_by_earlier_delivery_is_skipped() {
    let ctx = create_context(Data { a: "" });
    let inner_log = log::<String>();

    let ctx_in = ctx.clone();
    let inner_in = Rc::clone(&inner_log);
    let body = Slot::new(move || {
        let ctx = ctx_in.clone();
        let inner_log = Rc::clone(&inner_in);
        blocker(Slot::new(move || {
            let nested = ctx.clone();
            let inner_log = Rc::clone(&inner_log);
            ctx.consumer(move |data| {
                if data.a == "a" {
                    let inner_log = Rc::clone(&inner_log);
                    nested.consumer(move |data| recorder("i", data.a, &inner_log))
                } else {
                    Element::text("gone")
                }
            })
        }))
    });

    let mut renderer = Renderer::new();
    renderer.render(app(&ctx, &Rc::new(Data { a: "a" }), &body)).unwrap();
    assert_eq!(renderer.consumers_of(&ctx).len(), 2);

    renderer.render(app(&ctx, &Rc::new(Data { a: "b" }), &body)).unwrap();

    assert_eq!(*inner_log.borrow(), vec!["a".to_string()]);
    assert_eq!(renderer.to_html(), "gone");
    assert_eq!(renderer.stats().forced_deliveries, 1);
    let provider = renderer.providers_of(&ctx)[0];
    assert_eq!(renderer.subscribers(provider).unwrap().len(), 1);
}

#[test]
fn test_replacing_provider_token_rebinds_consumers() {
    let ctx = create_context("default");
    let other = create_context("other");

    let mut renderer = Renderer::new();
    renderer
        .render(ctx.provider("bound", vec![ctx.consumer(|v| Element::text(*v))]))
        .unwrap();
    assert_eq!(renderer.to_html(), "bound");

    renderer
        .render(other.provider("bound", vec![ctx.consumer(|v| Element::text(*v))]))
        .unwrap();
    assert_eq!(renderer.to_html(), "default");
    assert!(renderer.providers_of(&ctx).is_empty());

    let consumer = renderer.consumers_of(&ctx)[0];
    assert_eq!(renderer.subscription(consumer).unwrap(), None);
}

#[test]
fn test_full_unmount_releases_everything() {
    let ctx = create_context(Data { a: "" });
    let show = Rc::new(Cell::new(true));
    let consumed = log::<String>();
    let body = toggled(&ctx, &show, &consumed);

    let mut renderer = Renderer::new();
    renderer.render(app(&ctx, &Rc::new(Data { a: "a" }), &body)).unwrap();
    let consumer = renderer.consumers_of(&ctx)[0];
    assert!(renderer.contains(consumer));

    renderer.unmount().unwrap();
    assert_eq!(renderer.node_count(), 0);
    assert!(!renderer.contains(consumer));
    assert!(matches!(
        renderer.subscription(consumer),
        Err(TreeError::NodeNotFound(_))
    ));

    let stats = renderer.stats();
    assert_eq!(stats.mounts, stats.unmounts);
}

#[test]
fn test_render_empty_unmounts_previous_tree() {
    let ctx = create_context(0u32);
    let mut renderer = Renderer::new();
    renderer
        .render(ctx.provider(1u32, vec![ctx.consumer(|v| Element::text(v.to_string()))]))
        .unwrap();

    renderer.render(Element::Empty).unwrap();
    assert_eq!(renderer.node_count(), 1);
    assert!(renderer.consumers_of(&ctx).is_empty());
    assert_eq!(renderer.to_html(), "");
}

#[test]
fn test_ids_are_not_reused_after_unmount() {
    let ctx = create_context(0u32);
    let mut renderer = Renderer::new();
    renderer
        .render(ctx.provider(1u32, vec![ctx.consumer(|v| Element::text(v.to_string()))]))
        .unwrap();
    let first = renderer.consumers_of(&ctx)[0];

    renderer.unmount().unwrap();
    renderer
        .render(ctx.provider(1u32, vec![ctx.consumer(|v| Element::text(v.to_string()))]))
        .unwrap();
    let second = renderer.consumers_of(&ctx)[0];

    assert_ne!(first, second);
    assert!(!renderer.contains(first));
}
