//! Pre-send hooks.
//!
//! Hooks run against the message before it is mapped, in registration order.
//! A hook may rewrite the message (normalize headers, add recipients); later
//! hooks and the mapper see its changes. The caller's message is never
//! modified. The first hook that returns an error stops the send; nothing is
//! posted.

use std::borrow::Cow;
use std::sync::Arc;

use crate::errors::{EmailLabsError, EmailLabsResult};
use crate::types::Message;

/// Extension point invoked with the message before it is sent.
pub trait SendHook: Send + Sync {
    /// Name used in logs and in [`EmailLabsError::Hook`].
    fn name(&self) -> &str;

    /// Inspects or rewrites the message; an error aborts the send.
    fn before_send(&self, message: &mut Message) -> EmailLabsResult<()>;
}

/// Adapter turning a closure into a [`SendHook`].
pub struct FnHook<F> {
    name: String,
    f: F,
}

impl<F> FnHook<F>
where
    F: Fn(&mut Message) -> Result<(), String> + Send + Sync,
{
    /// Wraps `f` under the given hook name.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> SendHook for FnHook<F>
where
    F: Fn(&mut Message) -> Result<(), String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn before_send(&self, message: &mut Message) -> EmailLabsResult<()> {
        (self.f)(message).map_err(|reason| EmailLabsError::hook(&self.name, reason))
    }
}

impl<F> std::fmt::Debug for FnHook<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHook").field("name", &self.name).finish()
    }
}

/// Rejects messages whose sender list is empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequireSender;

impl SendHook for RequireSender {
    fn name(&self) -> &str {
        "require_sender"
    }

    fn before_send(&self, message: &mut Message) -> EmailLabsResult<()> {
        if message.from.is_empty() {
            return Err(EmailLabsError::hook(self.name(), "message has no sender"));
        }
        Ok(())
    }
}

/// Ordered list of hooks.
#[derive(Clone, Default)]
pub struct HookChain {
    hooks: Vec<Arc<dyn SendHook>>,
}

impl HookChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a hook.
    pub fn push(&mut self, hook: Arc<dyn SendHook>) {
        self.hooks.push(hook);
    }

    /// Returns the number of hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns true if no hook is registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Runs every hook in order, stopping at the first error.
    ///
    /// Returns the message the mapper should send: borrowed when no hook is
    /// registered, otherwise a hooked copy.
    pub fn run<'a>(&self, message: &'a Message) -> EmailLabsResult<Cow<'a, Message>> {
        if self.hooks.is_empty() {
            return Ok(Cow::Borrowed(message));
        }

        let mut hooked = message.clone();
        for hook in &self.hooks {
            tracing::trace!(hook = hook.name(), "Running pre-send hook");
            hook.before_send(&mut hooked)?;
        }
        Ok(Cow::Owned(hooked))
    }
}

impl std::fmt::Debug for HookChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.hooks.iter().map(|h| h.name()).collect();
        f.debug_struct("HookChain").field("hooks", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Address;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn message() -> Message {
        Message {
            to: vec![Address::new("a@x.com").unwrap()],
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_chain_borrows_message() {
        let chain = HookChain::new();
        let msg = message();

        assert!(chain.is_empty());
        assert!(matches!(chain.run(&msg).unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_hooks_rewrite_a_copy_in_order() {
        let mut chain = HookChain::new();
        chain.push(Arc::new(FnHook::new("subject", |m: &mut Message| {
            m.subject = format!("[shop] {}", m.subject);
            Ok(())
        })));
        chain.push(Arc::new(FnHook::new("audit_cc", |m: &mut Message| {
            assert!(m.subject.starts_with("[shop]"));
            m.cc.push(Address::new("audit@x.com").map_err(|e| e.to_string())?);
            Ok(())
        })));

        let mut msg = message();
        msg.subject = "Order".to_string();
        let hooked = chain.run(&msg).unwrap();

        assert_eq!(hooked.subject, "[shop] Order");
        assert_eq!(hooked.cc[0].email(), "audit@x.com");
        assert_eq!(msg.subject, "Order");
        assert!(msg.cc.is_empty());
    }

    #[test]
    fn test_chain_stops_at_first_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let after = Arc::clone(&calls);

        let mut chain = HookChain::new();
        chain.push(Arc::new(FnHook::new("reject", |_: &mut Message| {
            Err("nope".to_string())
        })));
        chain.push(Arc::new(FnHook::new("count", move |_: &mut Message| {
            after.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })));

        let err = chain.run(&message()).unwrap_err();
        match err {
            EmailLabsError::Hook { hook, message } => {
                assert_eq!(hook, "reject");
                assert_eq!(message, "nope");
            }
            other => panic!("Expected hook error, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_require_sender() {
        let mut msg = message();
        assert!(RequireSender.before_send(&mut msg).is_err());

        msg.from.push(Address::new("shop@x.com").unwrap());
        assert!(RequireSender.before_send(&mut msg).is_ok());
    }

    #[test]
    fn test_chain_debug_lists_names() {
        let mut chain = HookChain::new();
        chain.push(Arc::new(RequireSender));

        assert!(format!("{:?}", chain).contains("require_sender"));
    }
}
