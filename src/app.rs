use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::Rect;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::info;

use crate::{
  action::Action,
  components::{Component, error_view::ErrorView, item_detail::ItemDetail, item_list::ItemList},
  config::Config,
  inventory::{SharedItemStore, SubscriptionId},
  mode::Mode,
  tui::{self, Tui},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
  List,
  Detail,
  Error,
}

pub struct App {
  pub config: Config,
  pub store: SharedItemStore,
  pub item_list: Box<dyn Component>,
  pub item_detail: Box<dyn Component>,
  pub error_view: ErrorView,
  pub should_quit: bool,
  pub should_suspend: bool,
  pub mode: Mode,
  pub view: View,
  subscription: Option<SubscriptionId>,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let store = SharedItemStore::new();
    let item_list = Box::new(ItemList::new(store.clone()));
    let item_detail = Box::new(ItemDetail::new(store.clone()));
    Ok(Self {
      config,
      store,
      item_list,
      item_detail,
      error_view: ErrorView::default(),
      should_quit: false,
      should_suspend: false,
      mode: Mode::Default,
      view: View::List,
      subscription: None,
    })
  }

  /// Bridges store notifications into the action loop so every view refreshes after a change.
  fn observe_store(&mut self, action_tx: UnboundedSender<Action>) {
    if let Some(previous) = self.subscription.take() {
      self.store.unsubscribe(previous);
    }
    let subscription = self.store.subscribe(move |items| {
      log::trace!("Store changed, {} items", items.len());
      let _ = action_tx.send(Action::ItemsChanged);
    });
    self.subscription = Some(subscription);
  }

  fn active_component(&mut self) -> &mut dyn Component {
    match self.view {
      View::List => self.item_list.as_mut(),
      View::Detail => self.item_detail.as_mut(),
      View::Error => &mut self.error_view,
    }
  }

  fn global_key_action(&self, key: KeyEvent) -> Option<Action> {
    match key {
      KeyEvent { code: KeyCode::Char('c' | 'C'), modifiers: KeyModifiers::CONTROL, .. } => Some(Action::Quit),
      KeyEvent { code: KeyCode::Char('z' | 'Z'), modifiers: KeyModifiers::CONTROL, .. } => Some(Action::Suspend),
      KeyEvent { code: KeyCode::Char('q'), modifiers: KeyModifiers::NONE, .. }
        if self.mode == Mode::Default && self.view == View::List =>
      {
        Some(Action::Quit)
      },
      _ => None,
    }
  }

  /// Applies the view changes an action implies and forwards it to whichever components need it.
  async fn dispatch(&mut self, action: Action) -> Result<Vec<Action>> {
    let mut follow_ups = Vec::new();
    match &action {
      Action::Quit => self.should_quit = true,
      Action::Suspend => self.should_suspend = true,
      Action::Resume => self.should_suspend = false,
      Action::OpenDetail(_) => {
        self.view = View::Detail;
        self.mode = Mode::Input;
      },
      Action::CloseDetail | Action::ExitError => {
        self.view = View::List;
        self.mode = Mode::Default;
      },
      Action::Error(message) => {
        self.error_view.set_message(message.clone());
        self.view = View::Error;
        self.mode = Mode::Default;
      },
      _ => {},
    }

    match action {
      Action::ItemsChanged => {
        follow_ups.extend(self.item_list.update(Action::ItemsChanged).await?);
        if self.view == View::Detail {
          follow_ups.extend(self.item_detail.update(Action::ItemsChanged).await?);
        }
      },
      Action::OpenDetail(_) => follow_ups.extend(self.item_detail.update(action).await?),
      Action::Tick | Action::Render | Action::Resize(_, _) => {},
      action => follow_ups.extend(self.active_component().update(action).await?),
    }
    Ok(follow_ups)
  }

  fn draw(&mut self, tui: &mut Tui, action_tx: &UnboundedSender<Action>) -> Result<()> {
    let component = self.active_component();
    tui.draw(|f| {
      if let Err(e) = component.draw(f, f.area()) {
        let _ = action_tx.send(Action::Error(format!("Failed to draw: {:?}", e)));
      }
    })?;
    Ok(())
  }

  pub async fn run(&mut self) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();
    let tick_rate = self.config.tick_rate;
    let frame_rate = self.config.frame_rate;

    let mut tui = tui::Tui::new()?.tick_rate(tick_rate).frame_rate(frame_rate);
    tui.enter()?;

    self.observe_store(action_tx.clone());
    self.item_list.register_action_handler(action_tx.clone())?;
    self.item_detail.register_action_handler(action_tx.clone())?;
    info!("Started with tick rate {} and frame rate {}", tick_rate, frame_rate);

    loop {
      if let Some(e) = tui.next().await {
        match e {
          tui::Event::Quit => action_tx.send(Action::Quit)?,
          tui::Event::Tick => action_tx.send(Action::Tick)?,
          tui::Event::Render => action_tx.send(Action::Render)?,
          tui::Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
          tui::Event::Key(key) => {
            if let Some(action) = self.global_key_action(key) {
              action_tx.send(action)?;
            }
          },
          _ => {},
        }

        let is_global = matches!(e, tui::Event::Key(key) if self.global_key_action(key).is_some());
        if !is_global && let Some(action) = self.active_component().handle_events(Some(e)).await? {
          action_tx.send(action)?;
        }
      }

      while let Ok(action) = action_rx.try_recv() {
        if action != Action::Tick && action != Action::Render {
          log::debug!("{action:?}");
        }
        match action {
          Action::Resize(w, h) => {
            tui.resize(Rect::new(0, 0, w, h))?;
            self.draw(&mut tui, &action_tx)?;
          },
          Action::Render => self.draw(&mut tui, &action_tx)?,
          _ => {},
        }
        for follow_up in self.dispatch(action).await? {
          action_tx.send(follow_up)?;
        }
      }

      if self.should_suspend {
        tui.suspend()?;
        action_tx.send(Action::Resume)?;
        tui = Tui::new()?.tick_rate(tick_rate).frame_rate(frame_rate);
        tui.enter()?;
      } else if self.should_quit {
        tui.stop()?;
        break;
      }
    }
    tui.exit()?;
    Ok(())
  }
}
