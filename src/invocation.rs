//! Invocation context handed to handlers.
//!
//! Replies are collected on the context and returned to the caller of
//! [`Engine::dispatch`](crate::Engine::dispatch) in the [`DispatchReport`](crate::DispatchReport);
//! delivering them to a transport is up to the embedder.

use crate::host::{self, Host};
use crate::{Caller, ModuleId};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyStyle {
    Plain,
    Error,
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub style: ReplyStyle,
    pub text: String,
}

pub struct Invocation<'a> {
    raw: &'a str,
    command: &'a str,
    args: &'a [String],
    caller: &'a Caller,
    locale: Option<&'a str>,
    module: &'a ModuleId,
    host: &'a dyn Host,
    replies: Vec<Reply>,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(
        raw: &'a str,
        command: &'a str,
        args: &'a [String],
        caller: &'a Caller,
        locale: Option<&'a str>,
        module: &'a ModuleId,
        host: &'a dyn Host,
    ) -> Self {
        Invocation { raw, command, args, caller, locale, module, host, replies: Vec::new() }
    }

    /// The full message as received, prefix included.
    pub fn raw(&self) -> &str {
        self.raw
    }

    /// The matched command (`group command` for group members).
    pub fn command(&self) -> &str {
        self.command
    }

    /// Tokens left after the command name, before conversion.
    pub fn args(&self) -> &[String] {
        self.args
    }

    pub fn caller(&self) -> &Caller {
        self.caller
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale
    }

    /// Module that owns the running handler.
    pub fn module(&self) -> &ModuleId {
        self.module
    }

    pub fn replies(&self) -> &[Reply] {
        &self.replies
    }

    pub fn reply_styled(&mut self, style: ReplyStyle, text: impl Into<String>) {
        self.replies.push(Reply { style, text: text.into() });
    }

    pub fn reply(&mut self, text: impl Into<String>) {
        self.reply_styled(ReplyStyle::Plain, text);
    }

    pub fn reply_error(&mut self, text: impl Into<String>) {
        self.reply_styled(ReplyStyle::Error, text);
    }

    pub fn reply_warning(&mut self, text: impl Into<String>) {
        self.reply_styled(ReplyStyle::Warning, text);
    }

    pub fn reply_info(&mut self, text: impl Into<String>) {
        self.reply_styled(ReplyStyle::Info, text);
    }

    pub fn reply_success(&mut self, text: impl Into<String>) {
        self.reply_styled(ReplyStyle::Success, text);
    }

    /// Look up `key` in the owning module's string table.
    pub fn localize(&self, key: &str, params: &[&dyn fmt::Display]) -> String {
        let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
        host::localized(self.host, self.caller, self.module, key, &params)
    }

    pub fn reply_key_styled(&mut self, style: ReplyStyle, key: &str, params: &[&dyn fmt::Display]) {
        let text = self.localize(key, params);
        self.reply_styled(style, text);
    }

    pub fn reply_key(&mut self, key: &str, params: &[&dyn fmt::Display]) {
        self.reply_key_styled(ReplyStyle::Plain, key, params);
    }

    pub fn error_key(&mut self, key: &str, params: &[&dyn fmt::Display]) {
        self.reply_key_styled(ReplyStyle::Error, key, params);
    }

    pub fn warning_key(&mut self, key: &str, params: &[&dyn fmt::Display]) {
        self.reply_key_styled(ReplyStyle::Warning, key, params);
    }

    pub fn info_key(&mut self, key: &str, params: &[&dyn fmt::Display]) {
        self.reply_key_styled(ReplyStyle::Info, key, params);
    }

    pub fn success_key(&mut self, key: &str, params: &[&dyn fmt::Display]) {
        self.reply_key_styled(ReplyStyle::Success, key, params);
    }

    pub(crate) fn into_replies(self) -> Vec<Reply> {
        self.replies
    }
}

impl fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("raw", &self.raw)
            .field("command", &self.command)
            .field("args", &self.args)
            .field("caller", &self.caller)
            .field("locale", &self.locale)
            .field("module", &self.module)
            .field("replies", &self.replies)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticHost;

    #[test]
    fn localized_replies_use_module_scope() {
        let host = StaticHost::new().with_message("shop", None, "shop.bought", "You bought {0} x{1}");
        let caller = Caller::new(1, "Ana");
        let module = ModuleId::new("shop");
        let args = vec!["apple".to_string()];
        let mut inv = Invocation::new("/buy apple", "buy", &args, &caller, None, &module, &host);

        inv.success_key("shop.bought", &[&"apple", &3]);
        inv.reply_warning("low stock");

        let replies = inv.into_replies();
        assert_eq!(replies[0], Reply { style: ReplyStyle::Success, text: "You bought apple x3".to_string() });
        assert_eq!(replies[1].style, ReplyStyle::Warning);
    }
}
