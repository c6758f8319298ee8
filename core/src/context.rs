//! Per-invocation execution context: parent chain and object registry.
//!
//! A fresh context tree is built for every [`run`](crate::Command::run)
//! invocation: one node per command along the dispatch chain, each child
//! holding the only handle back to its parent. Nothing survives the
//! invocation and nothing is shared across sibling subcommand runs.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::command::Command;

/// Seed state for the root context of one invocation.
///
/// # Examples
///
/// ```
/// use argot_core::{Command, ContextSettings};
///
/// struct Config {
///     verbose: bool,
/// }
///
/// let cmd = Command::builder("app").build().unwrap();
/// let settings = ContextSettings::default()
///     .help_names(["-?"])
///     .object(Config { verbose: true });
/// cmd.run_with(Vec::<String>::new(), settings).unwrap();
/// ```
#[derive(Default)]
pub struct ContextSettings {
    pub(crate) help_names: Option<Vec<String>>,
    pub(crate) objects: Vec<(TypeId, Rc<dyn Any>)>,
}

impl ContextSettings {
    /// Replaces the help aliases recognized under this invocation.
    ///
    /// The command's own declared aliases stop being recognized for every
    /// context in the tree.
    pub fn help_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.help_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Pre-registers an object in the root context's registry.
    pub fn object<T: Any>(mut self, value: T) -> Self {
        self.objects.push((TypeId::of::<T>(), Rc::new(value)));
        self
    }
}

/// A node in the per-invocation context tree.
///
/// Holds a reference to the executing command, an optional parent handle,
/// and a small type-keyed object registry that ancestor lookups walk.
pub struct Context<'a> {
    command: &'a Command,
    parent: Option<Rc<Context<'a>>>,
    registry: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
    help_names: Option<Vec<String>>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        command: &'a Command,
        parent: Option<Rc<Context<'a>>>,
        settings: Option<ContextSettings>,
    ) -> Rc<Self> {
        let (override_names, seeded) = match settings {
            Some(s) => (s.help_names, s.objects),
            None => (None, Vec::new()),
        };
        // A root override governs the whole run: children copy it down.
        let help_names = override_names
            .or_else(|| parent.as_ref().and_then(|p| p.help_names.clone()));
        Rc::new(Self {
            command,
            parent,
            registry: RefCell::new(seeded.into_iter().collect()),
            help_names,
        })
    }

    /// The command this context was created for.
    pub fn command(&self) -> &'a Command {
        self.command
    }

    /// The enclosing context, if this is not the root.
    pub fn parent(&self) -> Option<&Rc<Context<'a>>> {
        self.parent.as_ref()
    }

    /// Walks parent links to the root of the tree. O(depth).
    pub fn root(self: &Rc<Self>) -> Rc<Context<'a>> {
        let mut current = Rc::clone(self);
        while let Some(parent) = current.parent.clone() {
            current = parent;
        }
        current
    }

    /// Help aliases in effect here: the override if set, else the
    /// declaring command's defaults.
    pub fn resolved_help_names(&self) -> &[String] {
        match &self.help_names {
            Some(names) => names,
            None => self.command.help_names(),
        }
    }

    /// Root-to-here command names, space-joined. Used in usage lines.
    pub fn command_path(&self) -> String {
        let mut names = vec![self.command.name().to_string()];
        let mut current = self.parent.clone();
        while let Some(ctx) = current {
            names.push(ctx.command.name().to_string());
            current = ctx.parent.clone();
        }
        names.reverse();
        names.join(" ")
    }

    /// Registers an object in this context's registry, returning the shared
    /// handle. Replaces any previous object of the same type.
    pub fn register<T: Any>(&self, value: T) -> Rc<T> {
        let shared = Rc::new(value);
        self.registry
            .borrow_mut()
            .insert(TypeId::of::<T>(), Rc::clone(&shared) as Rc<dyn Any>);
        shared
    }

    /// Searches this context, then each ancestor in turn, for a registered
    /// object of type `T`. Never mutates any registry.
    pub fn find_object<T: Any>(&self) -> Option<Rc<T>> {
        if let Some(entry) = self.registry.borrow().get(&TypeId::of::<T>()) {
            return Rc::clone(entry).downcast::<T>().ok();
        }
        self.parent.as_ref().and_then(|p| p.find_object::<T>())
    }

    /// Like [`find_object`](Self::find_object), but invokes `factory` once
    /// on a miss and returns its result.
    ///
    /// The fabricated object is *not* registered anywhere; callers that
    /// want later lookups to see it pass it to [`register`](Self::register)
    /// themselves.
    pub fn find_object_or_else<T: Any>(&self, factory: impl FnOnce() -> T) -> Rc<T> {
        match self.find_object::<T>() {
            Some(found) => found,
            None => Rc::new(factory()),
        }
    }
}
