//! Single-slot state containers with subscribed components.
//!
//! A [`State`] holds one value and a list of subscribers. Each subscriber is
//! a render function, a state → props mapper, a bag of fixed props and the
//! key of the element it last rendered. Changing the value re-renders every
//! subscriber and swaps its element in place through [`Dom::replace`].

use alloc::{rc::Rc, vec::Vec};
use core::{cell::RefCell, fmt};

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::{
    dom::{Dom, WeakDom},
    element::Element,
    error::Result,
    host::Host,
    key::Key,
    props::Props,
};

type RenderFn<H> = Rc<dyn Fn(&Dom<H>, Props) -> Result<Element<<H as Host>::Node>>>;
type MapFn<T> = Rc<dyn Fn(&T) -> Props>;

struct Subscription<T, H: Host> {
    render: RenderFn<H>,
    map: MapFn<T>,
    fixed: Props,
    key: Key,
}

impl<T, H: Host> Clone for Subscription<T, H> {
    fn clone(&self) -> Self {
        Self {
            render: Rc::clone(&self.render),
            map: Rc::clone(&self.map),
            fixed: self.fixed.clone(),
            key: self.key.clone(),
        }
    }
}

/// Fixed props first, mapped props on top.
fn render_props<T>(map: &MapFn<T>, fixed: &Props, value: &T) -> Props {
    fixed.clone().merge(map(value))
}

struct StateInner<T, H: Host> {
    dom: WeakDom<H>,
    value: RefCell<Rc<T>>,
    subscriptions: RefCell<Vec<Subscription<T, H>>>,
}

/// Handle to a reactive value and its subscribers.
pub struct State<T, H: Host> {
    inner: Rc<StateInner<T, H>>,
}

impl<T, H: Host> Clone for State<T, H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug, H: Host> fmt::Debug for State<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("value", &self.inner.value.borrow())
            .field("subscribers", &self.inner.subscriptions.borrow().len())
            .finish()
    }
}

impl<T: PartialEq + 'static, H: Host> State<T, H> {
    /// Creates a container bound to `dom`.
    ///
    /// The container only keeps a weak reference; once every [`Dom`] handle
    /// is gone, rendering operations fail with
    /// [`FlexError::NoActiveRegistry`](crate::FlexError::NoActiveRegistry).
    pub fn new(dom: &Dom<H>, initial: T) -> Self {
        Self {
            inner: Rc::new(StateInner {
                dom: dom.downgrade(),
                value: RefCell::new(Rc::new(initial)),
                subscriptions: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Returns a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        T::clone(&self.snapshot())
    }

    /// Runs `f` against the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.snapshot())
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscriptions.borrow().len()
    }

    /// Subscribes `render` with the state itself as props.
    ///
    /// # Errors
    ///
    /// See [`State::subscribe_with`].
    pub fn subscribe<F>(&self, render: F) -> Result<Element<H::Node>>
    where
        T: Serialize,
        F: Fn(&Dom<H>, Props) -> Result<Element<H::Node>> + 'static,
    {
        self.subscribe_with(render, |value: &T| Props::from_serialize(value), Props::new())
    }

    /// Renders `render` with `fixed` merged with `map(state)` and records the
    /// subscription. Mapped props win over fixed ones on collision.
    ///
    /// The returned element is not attached; mount it as usual.
    ///
    /// # Errors
    ///
    /// Fails with [`FlexError::NoActiveRegistry`](crate::FlexError::NoActiveRegistry)
    /// when the owning registry is gone, or with whatever `render` fails with.
    pub fn subscribe_with<F, M>(&self, render: F, map: M, fixed: Props) -> Result<Element<H::Node>>
    where
        F: Fn(&Dom<H>, Props) -> Result<Element<H::Node>> + 'static,
        M: Fn(&T) -> Props + 'static,
    {
        let dom = self.inner.dom.upgrade()?;
        let render: RenderFn<H> = Rc::new(render);
        let map: MapFn<T> = Rc::new(map);

        let props = render_props(&map, &fixed, &self.snapshot());
        let element = render(&dom, props)?;

        trace!(key = %element.key(), "subscribed");
        self.inner.subscriptions.borrow_mut().push(Subscription {
            render,
            map,
            fixed,
            key: element.key().clone(),
        });
        Ok(element)
    }

    /// Drops the subscription whose element is registered under `key`.
    ///
    /// Returns `true` if one was found.
    pub fn unsubscribe(&self, key: &Key) -> bool {
        let mut subscriptions = self.inner.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|subscription| &subscription.key != key);
        before != subscriptions.len()
    }

    /// Stores `value` and re-renders every subscriber.
    ///
    /// Nothing happens when `value` equals the current value. With
    /// `skip_render` the value is stored but no subscriber is re-rendered,
    /// which keeps focus in text inputs that feed the state.
    ///
    /// Returns the number of subscribers that were re-rendered.
    ///
    /// # Errors
    ///
    /// Stops at the first subscriber that fails to re-render and returns its
    /// error. The new value stays stored.
    pub fn set(&self, value: T, skip_render: bool) -> Result<usize> {
        if *self.snapshot() == value {
            trace!("state unchanged");
            return Ok(0);
        }
        *self.inner.value.borrow_mut() = Rc::new(value);

        if skip_render {
            debug!("state changed, render skipped");
            return Ok(0);
        }
        self.rerender()
    }

    /// Computes the next value from the current one, then behaves like
    /// [`State::set`].
    ///
    /// # Errors
    ///
    /// See [`State::set`].
    pub fn update(&self, f: impl FnOnce(&T) -> T, skip_render: bool) -> Result<usize> {
        let next = f(&self.snapshot());
        self.set(next, skip_render)
    }

    fn rerender(&self) -> Result<usize> {
        let dom = self.inner.dom.upgrade()?;
        let value = self.snapshot();
        // Render functions may subscribe again while we iterate.
        let subscriptions = self.inner.subscriptions.borrow().clone();

        for subscription in &subscriptions {
            let props = render_props(&subscription.map, &subscription.fixed, &value);
            let element = (subscription.render)(&dom, props)?;
            dom.replace(&subscription.key, element).inspect_err(|err| {
                warn!(key = %subscription.key, %err, "subscriber could not be replaced");
            })?;
        }
        debug!(count = subscriptions.len(), "state changed, subscribers re-rendered");
        Ok(subscriptions.len())
    }

    fn snapshot(&self) -> Rc<T> {
        Rc::clone(&self.inner.value.borrow())
    }
}
