// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Observe
//!
//! A keyed table of handlers.  At most one handler per key.  Observing a key again replaces the
//! previous handler, which is how an application overrides a default.

use std::collections::HashMap;
use std::hash::Hash;

pub type Handler<A> = Box<dyn FnMut(&mut A)>;

pub struct Observers<K, A> {
    handlers: HashMap<K, Handler<A>>,
}

impl<K: Hash + Eq, A> Observers<K, A> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register `handler` for `key`, replacing any handler already there.
    pub fn observe<F>(&mut self, key: K, handler: F)
    where
        F: FnMut(&mut A) + 'static,
    {
        self.handlers.insert(key, Box::new(handler));
    }

    /// Run the handler for `key`.  Returns whether one ran.
    pub fn invoke(&mut self, key: &K, args: &mut A) -> bool {
        match self.handlers.get_mut(key) {
            Some(handler) => {
                handler(args);
                true
            }
            None => false,
        }
    }

    pub fn forget(&mut self, key: &K) {
        self.handlers.remove(key);
    }

    pub fn is_observed(&self, key: &K) -> bool {
        self.handlers.contains_key(key)
    }
}

impl<K: Hash + Eq, A> Default for Observers<K, A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_invoke_runs_handler() {
        let mut observers: Observers<&str, Vec<u32>> = Observers::new();
        observers.observe("size", |log| log.push(1));

        let mut log = Vec::new();
        assert!(observers.invoke(&"size", &mut log));
        assert!(observers.invoke(&"size", &mut log));
        assert!(!observers.invoke(&"close", &mut log));
        assert_eq!(log, vec![1, 1]);
    }

    #[test]
    fn test_observe_replaces() {
        let mut observers: Observers<u32, Vec<&str>> = Observers::new();
        observers.observe(7, |log| log.push("first"));
        observers.observe(7, |log| log.push("second"));

        let mut log = Vec::new();
        observers.invoke(&7, &mut log);
        assert_eq!(log, vec!["second"]);
    }

    #[test]
    fn test_forget() {
        let mut observers: Observers<u32, ()> = Observers::default();
        observers.observe(1, |_| {});
        assert!(observers.is_observed(&1));
        observers.forget(&1);
        assert!(!observers.is_observed(&1));
        assert!(!observers.invoke(&1, &mut ()));
        // Forgetting an unknown key is fine.
        observers.forget(&2);
    }

    #[test]
    fn test_handler_keeps_state() {
        let mut observers: Observers<(), u32> = Observers::new();
        let mut calls = 0;
        observers.observe((), move |total| {
            calls += 1;
            *total = calls;
        });
        let mut total = 0;
        observers.invoke(&(), &mut total);
        observers.invoke(&(), &mut total);
        assert_eq!(total, 2);
    }
}
