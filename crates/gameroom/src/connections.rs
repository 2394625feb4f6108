use crate::message::ServerMessage;
use std::collections::HashSet;
use tokio::sync::mpsc::UnboundedSender;

/// Tracks each seat's outbound channel and disconnect state. Separate from
/// `pokerd_gameplay::Table`, which only knows about game state: this is
/// purely the wiring a `Room` uses to reach connections.
#[derive(Debug)]
pub struct Connections {
    senders: Vec<Option<UnboundedSender<ServerMessage>>>,
    disconnected: HashSet<usize>,
    spectators: Vec<UnboundedSender<ServerMessage>>,
}

impl Connections {
    /// Creates a connection registry with capacity for `n` seats.
    pub fn new(n: usize) -> Self {
        Self {
            senders: vec![None; n],
            disconnected: HashSet::new(),
            spectators: Vec::new(),
        }
    }

    pub fn seats(&self) -> usize {
        self.senders.len()
    }

    /// Registers a connection's outbound channel at a seat, clearing any
    /// prior disconnect mark (a reconnect).
    pub fn sit(&mut self, seat: usize, sender: UnboundedSender<ServerMessage>) {
        if seat < self.senders.len() {
            self.senders[seat] = Some(sender);
            self.disconnected.remove(&seat);
        }
    }

    /// Registers a spectator's outbound channel. Spectators have no seat
    /// and are always included in broadcasts.
    pub fn watch(&mut self, sender: UnboundedSender<ServerMessage>) {
        self.spectators.push(sender);
    }

    pub fn vacate(&mut self, seat: usize) {
        if seat < self.senders.len() {
            self.senders[seat] = None;
        }
        self.disconnected.remove(&seat);
    }

    pub fn disconnect(&mut self, seat: usize) {
        self.disconnected.insert(seat);
    }

    pub fn is_disconnected(&self, seat: usize) -> bool {
        self.disconnected.contains(&seat)
    }

    pub fn connected_count(&self) -> usize {
        self.senders
            .iter()
            .enumerate()
            .filter(|(seat, s)| s.is_some() && !self.disconnected.contains(seat))
            .count()
    }

    fn sender(&self, seat: usize) -> Option<&UnboundedSender<ServerMessage>> {
        self.senders.get(seat).and_then(|s| s.as_ref())
    }

    /// Sends a message to one seat.
    pub fn unicast(&self, seat: usize, message: ServerMessage) {
        match self.sender(seat).map(|tx| tx.send(message)) {
            Some(Ok(())) => {}
            Some(Err(e)) => log::warn!("unicast to seat {seat} failed: {e:?}"),
            None => log::warn!("unicast to seat {seat}: no connection"),
        }
    }

    /// Sends a message to every seated and spectating connection.
    pub fn broadcast(&self, message: ServerMessage) {
        for (seat, sender) in self.senders.iter().enumerate() {
            if let Some(tx) = sender {
                if let Err(e) = tx.send(message.clone()) {
                    log::warn!("broadcast to seat {seat} failed: {e:?}");
                }
            }
        }
        self.broadcast_spectators(message);
    }

    /// Sends a message to spectators only, leaving seated connections untouched.
    pub fn broadcast_spectators(&self, message: ServerMessage) {
        for tx in &self.spectators {
            let _ = tx.send(message.clone());
        }
    }
}

impl Default for Connections {
    fn default() -> Self {
        Self::new(9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn sit_and_disconnect_track_connected_count() {
        let mut conns = Connections::new(2);
        let (tx, _rx) = unbounded_channel();
        conns.sit(0, tx);
        assert_eq!(conns.connected_count(), 1);
        assert!(!conns.is_disconnected(0));
        conns.disconnect(0);
        assert!(conns.is_disconnected(0));
        assert_eq!(conns.connected_count(), 0);
    }

    #[test]
    fn reconnect_clears_disconnected_mark() {
        let mut conns = Connections::new(1);
        let (tx1, _rx1) = unbounded_channel();
        conns.sit(0, tx1);
        conns.disconnect(0);
        let (tx2, _rx2) = unbounded_channel();
        conns.sit(0, tx2);
        assert!(!conns.is_disconnected(0));
        assert_eq!(conns.connected_count(), 1);
    }

    #[test]
    fn broadcast_reaches_seats_and_spectators() {
        let mut conns = Connections::new(1);
        let (tx, mut rx) = unbounded_channel();
        conns.sit(0, tx);
        let (stx, mut srx) = unbounded_channel();
        conns.watch(stx);
        conns.broadcast(ServerMessage::Spectating);
        assert!(rx.try_recv().is_ok());
        assert!(srx.try_recv().is_ok());
    }
}
