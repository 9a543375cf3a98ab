use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("listener #{_0}")]
pub struct ListenerId(u64);

/// Callbacks subscribed to events of type `E`, invoked in subscription order.
pub struct Listeners<E> {
	next_id: u64,
	callbacks: Vec<(ListenerId, Box<dyn FnMut(&E)>)>,
}

impl<E> Default for Listeners<E> {
	fn default() -> Self {
		Self {
			next_id: 0,
			callbacks: Vec::new(),
		}
	}
}

impl<E> fmt::Debug for Listeners<E> {
	fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
		fmt
			.debug_struct("Listeners")
			.field("count", &self.callbacks.len())
			.finish()
	}
}

impl<E> Listeners<E> {
	pub fn subscribe(&mut self, f: impl FnMut(&E) + 'static) -> ListenerId {
		let id = ListenerId(self.next_id);
		self.next_id += 1;
		self.callbacks.push((id, Box::new(f)));
		id
	}

	/// Returns `false` if `id` was not subscribed.
	pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
		let before = self.callbacks.len();
		self.callbacks.retain(|(other, _)| *other != id);
		self.callbacks.len() != before
	}

	pub fn emit(&mut self, event: &E) {
		for (_, f) in &mut self.callbacks {
			f(event);
		}
	}

	pub fn len(&self) -> usize {
		self.callbacks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.callbacks.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::{cell::RefCell, rc::Rc};

	#[test]
	fn test_subscribe_emit_unsubscribe() {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let mut listeners = Listeners::<u32>::default();

		let a = listeners.subscribe({
			let seen = seen.clone();
			move |e| seen.borrow_mut().push(("a", *e))
		});
		listeners.subscribe({
			let seen = seen.clone();
			move |e| seen.borrow_mut().push(("b", *e))
		});

		listeners.emit(&1);
		assert!(listeners.unsubscribe(a));
		assert!(!listeners.unsubscribe(a));
		listeners.emit(&2);

		assert_eq!(*seen.borrow(), [("a", 1), ("b", 1), ("b", 2)]);
		assert_eq!(listeners.len(), 1);
		assert_eq!(a.to_string(), "listener #0");
	}
}
