#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Declare a [`CommandSpec`](crate::CommandSpec).
///
/// ```
/// use chatroute::{Param, ParamKind, command};
///
/// let spec = command! {
///     name: "give",
///     aliases: ["g"],
///     usage: "give <item>",
///     params: [Param::required("item", ParamKind::Text)],
///     run: |inv, args| {
///         inv.reply_success(format!("gave {}", args[0]));
///         Ok(())
///     },
/// };
/// assert_eq!(spec.name, "give");
/// ```
#[macro_export]
macro_rules! command {
    (
        name: $name:expr
        $(, group: $group:expr)?
        $(, aliases: [ $($alias:expr),* $(,)? ])?
        $(, admin_only: $admin:expr)?
        $(, description: $desc:expr)?
        $(, usage: $usage:expr)?
        $(, locales: [ $($locale:expr),* $(,)? ])?
        $(, params: [ $($param:expr),* $(,)? ])?
        , run: |$inv:ident, $args:ident| $body:block
        $(,)?
    ) => {{
        #[allow(unused_mut)]
        let mut spec = $crate::CommandSpec::new(
            $name,
            move |$inv: &mut $crate::Invocation<'_>, $args: &[$crate::Value]| -> $crate::HandlerResult { $body },
        );
        $( spec = spec.in_group($group); )?
        $( $( spec = spec.alias($alias); )* )?
        $( spec = spec.admin_only($admin); )?
        $( spec = spec.description($desc); )?
        $( spec = spec.usage($usage); )?
        $( $( spec = spec.locale($locale); )* )?
        $( $( spec = spec.param($param); )* )?
        spec
    }};
}
