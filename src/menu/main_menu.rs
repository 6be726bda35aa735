use crate::component::gif_encoder::{DitherMode, FrameSelection, ScaleMode};
use crate::config::save::save_settings;
use crate::config::types::{Config, Language};
use crate::menu::handlers::run_gif_maker;
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use rust_i18n::t;
use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_gif_maker"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_gif_maker(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(1) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(2) | None => Ok(false), // ESC pressed - exit
        _ => unreachable!(),
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());
        println!(
            "\n{} {}\n",
            style(t!("settings.encode.current")).dim(),
            config.settings.encode
        );

        let options = vec![
            t!("settings.opt_size"),
            t!("settings.opt_fps"),
            t!("settings.opt_scale"),
            t!("settings.opt_dither"),
            t!("settings.opt_selection"),
            t!("settings.opt_output_dir"),
            t!("settings.opt_tool_dir"),
            t!("settings.opt_language"),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        let changed = match selection {
            Some(0) => edit_size(config)?,
            Some(1) => edit_fps(config)?,
            Some(2) => select_value(
                term,
                t!("settings.opt_scale"),
                &ScaleMode::ALL,
                &mut config.settings.encode.scale_mode,
            )?,
            Some(3) => select_value(
                term,
                t!("settings.opt_dither"),
                &DitherMode::ALL,
                &mut config.settings.encode.dither_mode,
            )?,
            Some(4) => select_value(
                term,
                t!("settings.opt_selection"),
                &FrameSelection::ALL,
                &mut config.settings.encode.frame_selection,
            )?,
            Some(5) => edit_output_dir(config)?,
            Some(6) => edit_tool_dir(config)?,
            Some(7) => {
                let changed = select_value(
                    term,
                    t!("settings.opt_language"),
                    &Language::ALL,
                    &mut config.settings.language,
                )?;
                if changed {
                    rust_i18n::set_locale(config.settings.language.as_str());
                }
                changed
            }
            Some(8) | None => break, // ESC or back
            _ => unreachable!(),
        };

        if changed {
            save_settings(&config.settings)?;
            println!("\n{}", style(t!("settings.saved")).green());
            std::thread::sleep(std::time::Duration::from_secs(1));
        }
    }

    Ok(())
}

/// 從固定選項中挑一個；ESC 不變更。回傳是否有變更
fn select_value<T, P>(term: &Term, prompt: P, values: &[T], current: &mut T) -> Result<bool>
where
    T: Copy + PartialEq + Display,
    P: Into<String>,
{
    let items: Vec<String> = values.iter().map(ToString::to_string).collect();
    let default_index = values.iter().position(|v| *v == *current).unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    let Some(selection) = selection else {
        return Ok(false);
    };

    let selected = values[selection];
    if selected == *current {
        return Ok(false);
    }

    *current = selected;
    Ok(true)
}

fn edit_size(config: &mut Config) -> Result<bool> {
    let encode = &mut config.settings.encode;

    let width: u32 = Input::new()
        .with_prompt(t!("settings.encode.width"))
        .default(encode.width)
        .validate_with(|v: &u32| positive(*v))
        .interact_text()?;
    let height: u32 = Input::new()
        .with_prompt(t!("settings.encode.height"))
        .default(encode.height)
        .validate_with(|v: &u32| positive(*v))
        .interact_text()?;

    let changed = (width, height) != (encode.width, encode.height);
    encode.width = width;
    encode.height = height;
    Ok(changed)
}

fn edit_fps(config: &mut Config) -> Result<bool> {
    let encode = &mut config.settings.encode;

    let fps: u32 = Input::new()
        .with_prompt(t!("settings.encode.fps"))
        .default(encode.fps)
        .validate_with(|v: &u32| {
            if (1..=50).contains(v) {
                Ok(())
            } else {
                Err(t!("settings.encode.fps_range").to_string())
            }
        })
        .interact_text()?;

    let changed = fps != encode.fps;
    encode.fps = fps;
    Ok(changed)
}

fn edit_output_dir(config: &mut Config) -> Result<bool> {
    let current = config.settings.output_dir.clone().unwrap_or_default();

    let dir: String = Input::new()
        .with_prompt(t!("settings.output_dir_prompt"))
        .default(current.clone())
        .allow_empty(true)
        .interact_text()?;

    let dir = dir.trim().to_string();
    if dir == current {
        return Ok(false);
    }

    config.settings.output_dir = (!dir.is_empty()).then_some(dir);
    Ok(true)
}

fn edit_tool_dir(config: &mut Config) -> Result<bool> {
    let dir: String = Input::new()
        .with_prompt(t!("settings.tool_dir_prompt"))
        .default(config.settings.tool_dir.clone())
        .interact_text()?;

    let dir = dir.trim().to_string();
    if dir.is_empty() || dir == config.settings.tool_dir {
        return Ok(false);
    }

    config.settings.tool_dir = dir;
    Ok(true)
}

fn positive(value: u32) -> Result<(), String> {
    if value > 0 {
        Ok(())
    } else {
        Err(t!("settings.encode.positive").to_string())
    }
}
