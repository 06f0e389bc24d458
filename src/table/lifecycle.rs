use super::listeners::ListenerRegistry;
use crate::surface::Surface;

/// Two-phase lifecycle shared by every table component.
///
/// `attach` binds the component to the node it renders into; `detach`
/// releases everything it created, listeners included. A parent's `detach`
/// detaches its children.
pub trait Lifecycle<S: Surface> {
    fn attach(&mut self, surface: &mut S, listeners: &mut ListenerRegistry<S>, parent: S::Node);
    fn detach(&mut self, surface: &mut S, listeners: &mut ListenerRegistry<S>);
}
