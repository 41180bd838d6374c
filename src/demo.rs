//! Demo command set for the CLI.

use anyhow::bail;
use chatroute::{
    Caller, CommandSpec, EnumDef, Engine, GroupSpec, LocaleVariant, ModuleId, Options, Param, ParamKind, Principal,
    RegistrationError, StaticHost, Value, command,
};

pub const CALLER_ID: u64 = 1;

pub fn caller() -> Caller {
    Caller::new(CALLER_ID, "you")
}

pub fn host(locale: Option<&str>, admin: bool) -> StaticHost {
    let mut host = StaticHost::new()
        .with_principal(Principal::new(7, "Alice"))
        .with_principal(Principal::new(9, "Bob"))
        .with_message("items", None, "items.given", "Gave {1} x{0}.")
        .with_message("items", Some("es"), "items.given", "Entregado {1} x{0}.")
        .with_message("core", Some("es"), "command.permission_denied", "No puedes usar {0}.")
        .with_message("core", Some("es"), "command.missing_parameter", "Falta el parámetro '{0}'. Uso: {1}");
    if let Some(locale) = locale {
        host = host.with_locale(CALLER_ID, locale);
    }
    if admin {
        host = host.with_admin(CALLER_ID);
    }
    host
}

pub fn engine(options: Options) -> Result<Engine, RegistrationError> {
    let mut engine = Engine::new(options);
    engine.register_all(&ModuleId::new("items"), items())?;
    engine.register_all(&ModuleId::new("travel"), travel())?;

    let npc = ModuleId::new("npc");
    engine.register_group(&npc, GroupSpec::new("npc").alias("n"))?;
    engine.register_all(&npc, npcs())?;

    engine.register_all(&ModuleId::new("moderation"), moderation())?;
    Ok(engine)
}

fn items() -> Vec<CommandSpec> {
    vec![
        command! {
            name: "give",
            description: "Give an item by catalogue id",
            params: [Param::required("id", ParamKind::Id)],
            run: |inv, args| {
                inv.success_key("items.given", &[&1, &args[0]]);
                Ok(())
            },
        },
        command! {
            name: "give",
            description: "Give some of an item by name",
            locales: [LocaleVariant::new("es", "dar")],
            params: [
                Param::required("item", ParamKind::Text),
                Param::optional("count", ParamKind::Int, Value::Int(1)),
            ],
            run: |inv, args| {
                let count = args[1].as_i64().unwrap_or(1);
                inv.success_key("items.given", &[&count, &args[0]]);
                Ok(())
            },
        },
        command! {
            name: "paint",
            params: [Param::required("color", ParamKind::Enum(EnumDef::new("color", ["red", "green", "blue"])))],
            run: |inv, args| {
                inv.reply(format!("Everything is {} now.", args[0]));
                Ok(())
            },
        },
    ]
}

fn travel() -> Vec<CommandSpec> {
    vec![
        command! {
            name: "tp",
            aliases: ["teleport"],
            params: [Param::required("target", ParamKind::Principal)],
            run: |inv, args| {
                if let Some(target) = args[0].as_principal() {
                    inv.reply_info(format!("Teleported to {}.", target.name));
                }
                Ok(())
            },
        },
        command! {
            name: "tp",
            aliases: ["teleport"],
            params: [Param::required("position", ParamKind::Vector3)],
            run: |inv, args| {
                inv.reply_info(format!("Teleported to {}.", args[0]));
                Ok(())
            },
        },
        command! {
            name: "heal",
            description: "Restore health",
            locales: [LocaleVariant::new("es", "curar").description("Recupera salud").usage("curar [cantidad]")],
            params: [Param::optional("amount", ParamKind::Int, Value::Int(20))],
            run: |inv, args| {
                inv.reply_success(format!("Healed {} points.", args[0]));
                Ok(())
            },
        },
    ]
}

fn npcs() -> Vec<CommandSpec> {
    vec![
        command! {
            name: "create",
            group: "npc",
            params: [Param::required("name", ParamKind::Text)],
            run: |inv, args| {
                inv.reply(format!("Created {} at spawn.", args[0]));
                Ok(())
            },
        },
        command! {
            name: "create here",
            group: "npc",
            params: [Param::required("name", ParamKind::Text)],
            run: |inv, args| {
                inv.reply(format!("Created {} next to {}.", args[0], inv.caller().name));
                Ok(())
            },
        },
        command! {
            name: "list",
            group: "npc",
            run: |inv, _args| {
                inv.reply("No NPCs yet.");
                Ok(())
            },
        },
        command! {
            name: "remove",
            group: "npc",
            admin_only: true,
            params: [Param::required("id", ParamKind::Id)],
            run: |inv, args| {
                inv.reply_warning(format!("Removed NPC {}.", args[0]));
                Ok(())
            },
        },
        command! {
            name: "explode",
            group: "npc",
            run: |_inv, _args| {
                bail!("the fuse was wet")
            },
        },
    ]
}

fn moderation() -> Vec<CommandSpec> {
    vec![command! {
        name: "ban",
        admin_only: true,
        params: [
            Param::required("who", ParamKind::Principal),
            Param::optional("for", ParamKind::Duration, Value::Duration(chrono::TimeDelta::hours(1))),
        ],
        run: |inv, args| {
            let who = args[0].as_principal().map(|p| p.name.clone()).unwrap_or_default();
            let minutes = args[1].as_duration().map(|d| d.num_minutes()).unwrap_or_default();
            inv.reply_warning(format!("Banned {who} for {minutes} minutes."));
            Ok(())
        },
    }]
}
