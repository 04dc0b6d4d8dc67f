//! Integration tests for resolving consumers against the nearest provider

use super::support::*;
use canopy::{create_context, create_context_named, Element, Renderer};
use std::rc::Rc;

#[test]
fn test_passes_context_to_consumer() {
    let ctx = create_context(fields(&[]));
    let value = Rc::new(fields(&[("a", "a")]));
    let seen = log::<Rc<Fields>>();
    let renders = log::<String>();

    let seen_in = Rc::clone(&seen);
    let renders_in = Rc::clone(&renders);
    let mut renderer = Renderer::new();
    renderer
        .render(ctx.provider(
            Rc::clone(&value),
            vec![Element::from(Element::tag("div").child(ctx.consumer(move |data| {
                seen_in.borrow_mut().push(Rc::clone(&data));
                recorder("div", field(&data, "a"), &renders_in)
            })))],
        ))
        .unwrap();

    assert_eq!(seen.borrow().len(), 1);
    assert!(Rc::ptr_eq(&seen.borrow()[0], &value));
    assert_eq!(*renders.borrow(), vec!["a".to_string()]);
    assert_eq!(renderer.to_html(), "<div><div>a</div></div>");
}

#[test]
fn test_nested_providers_of_the_same_token() {
    let ctx = create_context(fields(&[]));
    let renders = log::<String>();

    let inner_ctx = ctx.clone();
    let renders_in = Rc::clone(&renders);
    let mut renderer = Renderer::new();
    renderer
        .render(ctx.provider(
            fields(&[("a", "a")]),
            vec![ctx.consumer(move |data| {
                let renders = Rc::clone(&renders_in);
                inner_ctx.provider(
                    fields(&[("b", "b")]),
                    vec![inner_ctx.consumer(move |child| {
                        let all = merged(&data, &child);
                        recorder("div", format!("{} - {}", field(&all, "a"), field(&all, "b")), &renders)
                    })],
                )
            })],
        ))
        .unwrap();

    assert_eq!(*renders.borrow(), vec!["a - b".to_string()]);
    assert_eq!(renderer.to_html(), "<div>a - b</div>");

    // The inner consumer sees only the inner provider's value.
    let consumers = renderer.consumers_of(&ctx);
    let providers = renderer.providers_of(&ctx);
    assert_eq!(consumers.len(), 2);
    assert_eq!(renderer.subscription(consumers[0]).unwrap(), Some(providers[0]));
    assert_eq!(renderer.subscription(consumers[1]).unwrap(), Some(providers[1]));
    assert_eq!(
        *renderer.context_value(consumers[1], &ctx).unwrap(),
        fields(&[("b", "b")])
    );
}

#[test]
fn test_different_tokens_in_either_nesting_order() {
    let theme = create_context_named("theme", "light");
    let data = create_context_named("data", fields(&[]));

    let build = |theme_outside: bool| {
        let data_in = data.clone();
        let body = theme.consumer(move |t| {
            let t = *t;
            data_in.consumer(move |d| Element::tag("div").child(format!("{} - {}", t, field(&d, "global"))).into())
        });
        if theme_outside {
            theme.provider("black", vec![data.provider(fields(&[("global", "a")]), vec![body])])
        } else {
            data.provider(fields(&[("global", "a")]), vec![theme.provider("black", vec![body])])
        }
    };

    for theme_outside in [true, false] {
        let mut renderer = Renderer::new();
        renderer.render(build(theme_outside)).unwrap();
        assert_eq!(renderer.to_html(), "<div>black - a</div>");
    }
}

#[test]
fn test_nested_consumers_share_a_provider() {
    let ctx = create_context(fields(&[]));
    let renders = log::<String>();

    let inner_ctx = ctx.clone();
    let renders_in = Rc::clone(&renders);
    let mut renderer = Renderer::new();
    renderer
        .render(ctx.provider(
            fields(&[("a", "a")]),
            vec![ctx.consumer(move |data| {
                let renders = Rc::clone(&renders_in);
                inner_ctx.consumer(move |child| {
                    recorder("div", field(&merged(&data, &child), "a"), &renders)
                })
            })],
        ))
        .unwrap();

    assert_eq!(renderer.to_html(), "<div>a</div>");
    let provider = renderer.providers_of(&ctx)[0];
    assert_eq!(renderer.subscribers(provider).unwrap(), renderer.consumers_of(&ctx));
}

#[test]
fn test_reaches_through_nested_components() {
    let ctx = create_context(Data { a: "" });
    let renders = log::<String>();

    let ctx_in = ctx.clone();
    let renders_in = Rc::clone(&renders);
    let innermost = Slot::new(move || {
        let renders = Rc::clone(&renders_in);
        Element::component::<Wrapper>(WrapperProps {
            tag: Some("div"),
            block_updates: false,
            slot: Slot::new({
                let ctx = ctx_in.clone();
                move || {
                    let renders = Rc::clone(&renders);
                    ctx.consumer(move |data| recorder("strong", data.a, &renders))
                }
            }),
        })
    });
    let inner = Slot::new(move || passthrough(innermost.clone()));
    let outer = Element::component::<Wrapper>(WrapperProps {
        tag: Some("div"),
        block_updates: false,
        slot: inner,
    });

    let mut renderer = Renderer::new();
    renderer.render(ctx.provider(Data { a: "a" }, vec![outer])).unwrap();

    assert_eq!(renderer.to_html(), "<div><div><strong>a</strong></div></div>");
    assert_eq!(*renders.borrow(), vec!["a".to_string()]);
    assert_eq!(renderer.find_components::<Wrapper>().len(), 3);
}

#[test]
fn test_default_without_provider() {
    let ctx = create_context("default");
    let other = create_context("other default");

    let mut renderer = Renderer::new();
    renderer
        .render(other.provider(
            "bound",
            vec![Element::from(Element::tag("p").child(ctx.consumer(|v| Element::text(*v))))],
        ))
        .unwrap();

    assert_eq!(renderer.to_html(), "<p>default</p>");
    let consumer = renderer.consumers_of(&ctx)[0];
    assert_eq!(renderer.subscription(consumer).unwrap(), None);
    let provider = renderer.providers_of(&other)[0];
    assert!(renderer.subscribers(provider).unwrap().is_empty());
}

#[test]
fn test_shadowing_stays_inside_the_subtree() {
    let ctx = create_context("default");

    let mut renderer = Renderer::new();
    renderer
        .render(ctx.provider(
            "outer",
            vec![
                Element::tag("section")
                    .child(ctx.provider("inner", vec![ctx.consumer(|v| Element::text(*v))]))
                    .into(),
                ctx.consumer(|v| Element::text(*v)),
            ],
        ))
        .unwrap();

    assert_eq!(renderer.to_html(), "<section>inner</section>outer");

    let providers = renderer.providers_of(&ctx);
    let consumers = renderer.consumers_of(&ctx);
    assert_eq!(renderer.subscribers(providers[0]).unwrap(), vec![consumers[1]]);
    assert_eq!(renderer.subscribers(providers[1]).unwrap(), vec![consumers[0]]);
}

#[test]
fn test_deep_pass_through_needs_no_props() {
    let ctx = create_context(0u32);
    let ctx_in = ctx.clone();
    let leaf = Slot::new(move || ctx_in.consumer(|v| Element::text(v.to_string())));

    let mut renderer = Renderer::new();
    renderer.render(ctx.provider(42u32, vec![nest(40, leaf)])).unwrap();

    assert!(renderer.to_html().contains("42"));
    assert_eq!(renderer.find_components::<Wrapper>().len(), 40);
    let consumer = renderer.consumers_of(&ctx)[0];
    assert_eq!(*renderer.context_value(consumer, &ctx).unwrap(), 42);
}

#[test]
fn test_provider_is_not_its_own_ancestor() {
    let ctx = create_context("default");
    let mut renderer = Renderer::new();
    renderer
        .render(ctx.provider("outer", vec![ctx.provider("inner", Vec::<Element>::new())]))
        .unwrap();

    let providers = renderer.providers_of(&ctx);
    assert_eq!(*renderer.context_value(providers[0], &ctx).unwrap(), "default");
    assert_eq!(*renderer.context_value(providers[1], &ctx).unwrap(), "outer");
}
