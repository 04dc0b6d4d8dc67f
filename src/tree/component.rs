//! User components and their type-erased mounted form.

use crate::tree::element::Element;
use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

/// A stateful component.
///
/// `should_update` is the render-skip hook: returning false keeps the
/// component and its whole subtree untouched for that update. Context
/// delivery to consumers below it is not subject to this decision.
pub trait Component: 'static {
    type Props: 'static;

    fn create(props: &Self::Props) -> Self
    where
        Self: Sized;

    fn render(&mut self, props: &Self::Props) -> Element;

    fn should_update(&mut self, _old: &Self::Props, _new: &Self::Props) -> bool {
        true
    }

    /// Called before the component's subtree is torn down.
    fn unmounted(&mut self) {}
}

/// Unmounted component description.
pub struct ComponentElement {
    pub(crate) type_id: TypeId,
    pub(crate) name: &'static str,
    pub(crate) props: Rc<dyn Any>,
    pub(crate) mount: fn(Rc<dyn Any>) -> Option<Box<dyn AnyComponent>>,
}

impl ComponentElement {
    pub(crate) fn new<C: Component>(props: C::Props) -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            name: std::any::type_name::<C>(),
            props: Rc::new(props),
            mount: mount_erased::<C>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ComponentElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentElement")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

pub(crate) trait AnyComponent {
    fn should_update(&mut self, next: &dyn Any) -> bool;
    fn set_props(&mut self, next: Rc<dyn Any>);
    fn render(&mut self) -> Element;
    fn unmounted(&mut self);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Mounted<C: Component> {
    component: C,
    props: Rc<C::Props>,
}

fn mount_erased<C: Component>(props: Rc<dyn Any>) -> Option<Box<dyn AnyComponent>> {
    let props = props.downcast::<C::Props>().ok()?;
    let component = C::create(&props);
    let mounted: Box<dyn AnyComponent> = Box::new(Mounted { component, props });
    Some(mounted)
}

impl<C: Component> AnyComponent for Mounted<C> {
    fn should_update(&mut self, next: &dyn Any) -> bool {
        match next.downcast_ref::<C::Props>() {
            Some(next) => self.component.should_update(&self.props, next),
            None => true,
        }
    }

    fn set_props(&mut self, next: Rc<dyn Any>) {
        if let Ok(props) = next.downcast::<C::Props>() {
            self.props = props;
        }
    }

    fn render(&mut self) -> Element {
        let props = Rc::clone(&self.props);
        self.component.render(&props)
    }

    fn unmounted(&mut self) {
        self.component.unmounted();
    }

    fn as_any(&self) -> &dyn Any {
        &self.component
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        &mut self.component
    }
}
