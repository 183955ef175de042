//! Example showing the Explorer context menu of files in a winit window.
//!
//! Pass one or more paths from the same folder on the command line, then right-click anywhere
//! in the window. `Delete` deletes the files and `F2` starts renaming them.

#[cfg(all(target_os = "windows", feature = "popup"))]
mod app {
    use std::path::PathBuf;

    use shell_menu::{hwnd_for_window, ShellContextMenu, ShellMenuManager};
    use tracing::{error, info, warn};
    use winit::application::ApplicationHandler;
    use winit::dpi::PhysicalPosition;
    use winit::event::{ElementState, MouseButton, WindowEvent};
    use winit::event_loop::{ActiveEventLoop, EventLoop};
    use winit::keyboard::{Key, NamedKey};
    use winit::window::{Window, WindowAttributes, WindowId};
    use windows::Win32::System::Com::{COINIT_APARTMENTTHREADED, CoInitializeEx, CoUninitialize};

    struct App {
        window: Option<Box<dyn Window>>,
        paths: Vec<PathBuf>,
        menu_manager: ShellMenuManager,
    }

    impl App {
        fn new(paths: Vec<PathBuf>) -> Self {
            App {
                window: None,
                paths,
                menu_manager: ShellMenuManager::new(),
            }
        }

        /// Show the shell context menu of the paths at the given position.
        fn show_context_menu(&self, position: PhysicalPosition<f64>) {
            let Some(window) = self.window.as_ref() else {
                return;
            };

            let pos = PhysicalPosition::new(position.x as i32, position.y as i32);
            match self.menu_manager.show(window, &self.paths, pos) {
                Ok(Some(ordinal)) => info!(?ordinal, "Shell command invoked"),
                Ok(None) => info!("Context menu dismissed"),
                Err(err) => error!(%err, "failed to show context menu"),
            }
        }

        fn run_shortcut(&self, key: NamedKey) {
            let Some(window) = self.window.as_ref() else {
                return;
            };

            let result = hwnd_for_window(window)
                .and_then(|hwnd| ShellContextMenu::for_paths(&self.paths, hwnd))
                .and_then(|menu| match key {
                    NamedKey::Delete => menu.invoke_delete(),
                    NamedKey::F2 => menu.invoke_rename(),
                    _ => Ok(()),
                });

            if let Err(err) = result {
                warn!(%err, ?key, "shortcut failed");
            }
        }
    }

    impl ApplicationHandler for App {
        fn can_create_surfaces(&mut self, event_loop: &dyn ActiveEventLoop) {
            let window_attributes = WindowAttributes::default()
                .with_title("Shell Menu Example - Right-click anywhere!");

            let window = match event_loop.create_window(window_attributes) {
                Ok(window) => window,
                Err(err) => {
                    error!(%err, "failed to create window");
                    event_loop.exit();
                    return;
                }
            };

            self.window = Some(window);
            info!(paths = ?self.paths, "Window created. Right-click anywhere to see the shell menu!");
        }

        fn window_event(&mut self, event_loop: &dyn ActiveEventLoop, _: WindowId, event: WindowEvent) {
            match event {
                WindowEvent::CloseRequested => {
                    info!("close requested");
                    event_loop.exit();
                }
                WindowEvent::PointerButton {
                    state,
                    button,
                    position,
                    ..
                } => {
                    if state == ElementState::Released {
                        if let winit::event::ButtonSource::Mouse(MouseButton::Right) = button {
                            self.show_context_menu(position);
                        }
                    }
                }
                WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                    if let Key::Named(key) = event.logical_key {
                        self.run_shortcut(key);
                    }
                }
                _ => (),
            }
        }
    }

    pub fn run() -> anyhow::Result<()> {
        let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
        if paths.is_empty() {
            anyhow::bail!("usage: shell_menu <path>...");
        }

        // The shell's context-menu objects need a single-threaded apartment.
        unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) }.ok()?;

        let event_loop = EventLoop::new()?;
        let app = App::new(paths);

        info!("Starting shell menu example...");
        let result = event_loop.run_app(app);

        unsafe { CoUninitialize() };
        Ok(result?)
    }
}

#[cfg(all(target_os = "windows", feature = "popup"))]
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    app::run()
}

#[cfg(not(all(target_os = "windows", feature = "popup")))]
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::error!("the shell context menu is only available on Windows");
    Ok(())
}
