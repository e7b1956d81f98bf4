//! The registry instance every mounting call is threaded through.
//!
//! A [`Dom`] owns the host, the root element and the key → node registry.
//! Handles are cheap to clone and any number of independent instances may
//! live side by side.

use alloc::rc::{Rc, Weak};
use core::{cell::RefCell, fmt};

use tracing::{debug, trace};

use crate::{
    element::{Children, Element},
    error::{FlexError, Result},
    host::Host,
    key::{Key, KeyGenerator, KeyStrategy},
    props::Props,
    registry::{NodeRecord, Registry},
    state::State,
};

/// Attribute that carries an element's key in the host document.
pub const DEFAULT_KEY_ATTRIBUTE: &str = "data-flex-key";

/// Settings for a [`Dom`] instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomConfig {
    key_strategy: KeyStrategy,
    key_attribute: String,
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            key_strategy: KeyStrategy::default(),
            key_attribute: DEFAULT_KEY_ATTRIBUTE.to_owned(),
        }
    }
}

impl DomConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects how element keys are minted.
    #[must_use]
    pub const fn with_key_strategy(mut self, strategy: KeyStrategy) -> Self {
        self.key_strategy = strategy;
        self
    }

    /// Renames the attribute keys are written to.
    #[must_use]
    pub fn with_key_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.key_attribute = attribute.into();
        self
    }

    /// The configured key strategy.
    #[must_use]
    pub const fn key_strategy(&self) -> KeyStrategy {
        self.key_strategy
    }

    /// The configured key attribute.
    #[must_use]
    pub fn key_attribute(&self) -> &str {
        &self.key_attribute
    }
}

struct DomInner<H: Host> {
    host: H,
    root: Element<H::Node>,
    key_attribute: String,
    registry: RefCell<Registry<H::Node>>,
    keys: RefCell<KeyGenerator>,
}

/// Handle to one registry instance bound to a root element.
pub struct Dom<H: Host> {
    inner: Rc<DomInner<H>>,
}

impl<H: Host> Clone for Dom<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H: Host> fmt::Debug for Dom<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dom")
            .field("root", &self.inner.root)
            .field("registered", &self.inner.registry.borrow().len())
            .finish_non_exhaustive()
    }
}

impl<H: Host> Dom<H> {
    /// Binds a registry to the element matching `root_selector`.
    ///
    /// # Errors
    ///
    /// Returns [`FlexError::RootNotFound`] if the selector matches nothing.
    pub fn initialize(host: H, root_selector: &str) -> Result<Self> {
        Self::with_config(host, root_selector, DomConfig::default())
    }

    /// Like [`Dom::initialize`], with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`FlexError::RootNotFound`] if the selector matches nothing.
    pub fn with_config(host: H, root_selector: &str, config: DomConfig) -> Result<Self> {
        let node = host
            .query_selector(root_selector)?
            .ok_or_else(|| FlexError::RootNotFound(root_selector.to_owned()))?;

        let mut keys = KeyGenerator::new(config.key_strategy);
        let key = keys.next_key(|_| false)?;

        let mut registry = Registry::new();
        registry.insert(
            key.clone(),
            NodeRecord::new(host.parent_of(&node), node.clone()),
        );
        debug!(root_selector, %key, "registry bound to root");

        Ok(Self {
            inner: Rc::new(DomInner {
                host,
                root: Element::new(key, node),
                key_attribute: config.key_attribute,
                registry: RefCell::new(registry),
                keys: RefCell::new(keys),
            }),
        })
    }

    /// The host this registry renders into.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.inner.host
    }

    /// The root element and the key it was seeded under.
    #[must_use]
    pub fn root(&self) -> &Element<H::Node> {
        &self.inner.root
    }

    /// The attribute keys are written to.
    #[must_use]
    pub fn key_attribute(&self) -> &str {
        &self.inner.key_attribute
    }

    /// Builds the top-level element and attaches it under the root.
    ///
    /// # Errors
    ///
    /// Propagates any failure of the factory or of the attach.
    pub fn render<F>(&self, factory: F) -> Result<Element<H::Node>>
    where
        F: FnOnce(&Self) -> Result<Element<H::Node>>,
    {
        let element = factory(self)?;
        self.add(Some(self.root()), Some(element.clone()))?;
        debug!(key = %element.key(), "rendered top-level component");
        Ok(element)
    }

    /// Appends `child` under `parent` and records it in the registry.
    ///
    /// An existing entry for the child's key is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`FlexError::MissingParent`] or [`FlexError::MissingChild`]
    /// when either side is absent, or the host's error if it refuses the
    /// insertion.
    pub fn add(
        &self,
        parent: Option<&Element<H::Node>>,
        child: Option<Element<H::Node>>,
    ) -> Result<()> {
        let parent = parent.ok_or(FlexError::MissingParent)?;
        let child = child.ok_or(FlexError::MissingChild)?;

        self.inner.host.append_child(parent.node(), child.node())?;

        let (key, node) = child.into_parts();
        trace!(%key, parent = %parent.key(), "attached");
        self.inner
            .registry
            .borrow_mut()
            .insert(key, NodeRecord::new(Some(parent.node().clone()), node));
        Ok(())
    }

    /// Swaps the node registered under `key` for `element`, in place.
    ///
    /// The new node takes over `key`; its parent stays the same. Returns the
    /// element re-keyed accordingly.
    ///
    /// # Errors
    ///
    /// Returns [`FlexError::UnknownKey`] if `key` was never registered,
    /// [`FlexError::MissingParent`] when targeting a parentless root, or the
    /// host's error if the swap fails.
    pub fn replace(&self, key: &Key, element: Element<H::Node>) -> Result<Element<H::Node>> {
        let (parent, current) = {
            let registry = self.inner.registry.borrow();
            let record = registry
                .get(key)
                .ok_or_else(|| FlexError::UnknownKey(key.clone()))?;
            let parent = record.parent().cloned().ok_or(FlexError::MissingParent)?;
            (parent, record.current().clone())
        };

        let (_, node) = element.into_parts();
        let host = &self.inner.host;
        host.set_key(&node, &self.inner.key_attribute, key)?;
        host.replace_child(&parent, &node, &current)?;

        self.inner
            .registry
            .borrow_mut()
            .swap_current(key, node.clone());
        debug!(%key, "replaced element");
        Ok(Element::new(key.clone(), node))
    }

    /// Looks up the record for `key`.
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<NodeRecord<H::Node>> {
        self.inner.registry.borrow().get(key).cloned()
    }

    /// Returns `true` if `key` is registered.
    #[must_use]
    pub fn contains(&self, key: &Key) -> bool {
        self.inner.registry.borrow().contains(key)
    }

    /// Number of registered keys, the root and stale entries included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    /// Always `false`: the root is registered from the start.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.registry.borrow().is_empty()
    }

    /// Constructs a keyed element.
    ///
    /// Static attributes are assigned under their verbatim names and event
    /// bindings are installed as listeners. Text children become the text
    /// content; element children are attached through [`Dom::add`], which
    /// registers each of them with the new element as parent.
    ///
    /// # Errors
    ///
    /// Propagates host failures and key exhaustion. Children attached before
    /// a failure stay attached.
    pub fn element(
        &self,
        tag: &str,
        children: impl Into<Children<H::Node>>,
        props: Props,
    ) -> Result<Element<H::Node>> {
        let host = &self.inner.host;
        let node = host.create_element(tag)?;
        let key = self.mint_key()?;
        host.set_key(&node, &self.inner.key_attribute, &key)?;

        for (name, value) in props.attributes() {
            host.set_property(&node, name, value)?;
        }
        for (event, handler) in props.events() {
            host.listen(&node, event, handler.clone())?;
        }

        let element = Element::new(key, node);
        match children.into() {
            Children::Text(text) => host.set_text(element.node(), &text)?,
            Children::Elements(children) => {
                for child in children {
                    self.add(Some(&element), Some(child))?;
                }
            }
        }
        trace!(tag, key = %element.key(), "constructed element");
        Ok(element)
    }

    /// Creates a state container local to this registry.
    pub fn use_state<T: PartialEq + 'static>(&self, initial: T) -> State<T, H> {
        State::new(self, initial)
    }

    pub(crate) fn downgrade(&self) -> WeakDom<H> {
        WeakDom(Rc::downgrade(&self.inner))
    }

    fn mint_key(&self) -> Result<Key> {
        let registry = self.inner.registry.borrow();
        self.inner
            .keys
            .borrow_mut()
            .next_key(|key| registry.contains(key))
    }
}

/// Non-owning reference to a [`Dom`], held by state containers.
pub(crate) struct WeakDom<H: Host>(Weak<DomInner<H>>);

impl<H: Host> WeakDom<H> {
    pub(crate) fn upgrade(&self) -> Result<Dom<H>> {
        self.0
            .upgrade()
            .map(|inner| Dom { inner })
            .ok_or(FlexError::NoActiveRegistry)
    }
}

impl<H: Host> Clone for WeakDom<H> {
    fn clone(&self) -> Self {
        Self(Weak::clone(&self.0))
    }
}

/// Binds a registry to `root_selector` and mounts the top-level component.
///
/// # Errors
///
/// Returns [`FlexError::RootNotFound`] if the selector matches nothing, or
/// whatever the factory or the attach fails with.
pub fn start<H, F>(host: H, root_selector: &str, factory: F) -> Result<Dom<H>>
where
    H: Host,
    F: FnOnce(&Dom<H>) -> Result<Element<H::Node>>,
{
    start_with_config(host, root_selector, DomConfig::default(), factory)
}

/// [`start`] with explicit settings.
///
/// # Errors
///
/// See [`start`].
pub fn start_with_config<H, F>(
    host: H,
    root_selector: &str,
    config: DomConfig,
    factory: F,
) -> Result<Dom<H>>
where
    H: Host,
    F: FnOnce(&Dom<H>) -> Result<Element<H::Node>>,
{
    let dom = Dom::with_config(host, root_selector, config)?;
    dom.render(factory)?;
    Ok(dom)
}
